use crate::PressError;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;

/// Color space of a returned document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorMode {
    Cmyk,
    /// Conversion was requested but the tool failed; the document is
    /// still in its source color space.
    RgbFallback,
}

impl ColorMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ColorMode::Cmyk => "cmyk",
            ColorMode::RgbFallback => "rgb-fallback",
        }
    }
}

/// Ghostscript invocation settings.
#[derive(Debug, Clone)]
pub struct GhostscriptConfig {
    pub binary: PathBuf,
    /// Output ICC profile for the CMYK target. Without one,
    /// Ghostscript uses its default CMYK conversion.
    pub icc_profile: Option<PathBuf>,
    pub timeout: Duration,
}

impl Default for GhostscriptConfig {
    fn default() -> Self {
        Self {
            binary: PathBuf::from("gs"),
            icc_profile: None,
            timeout: Duration::from_secs(60),
        }
    }
}

impl GhostscriptConfig {
    /// Whether the configured binary can be spawned at all. Used by
    /// health reporting, not by the conversion path.
    pub async fn probe(&self) -> bool {
        Command::new(&self.binary)
            .arg("--version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .status()
            .await
            .map(|status| status.success())
            .unwrap_or(false)
    }
}

#[derive(Debug)]
pub struct ConversionOutcome {
    pub pdf: Vec<u8>,
    pub mode: ColorMode,
    pub fallback_reason: Option<String>,
}

/// Vector-preserving CMYK conversion through Ghostscript's pdfwrite
/// device. Any failure, including a timeout or a missing binary,
/// returns the RGB input unchanged with the mode flagged: a document
/// in the wrong color space beats no document.
pub async fn convert_to_cmyk(pdf: &[u8], config: &GhostscriptConfig) -> ConversionOutcome {
    match run_ghostscript(pdf, config).await {
        Ok(converted) => ConversionOutcome {
            pdf: converted,
            mode: ColorMode::Cmyk,
            fallback_reason: None,
        },
        Err(e) => {
            log::warn!("color conversion failed, returning RGB output: {}", e);
            ConversionOutcome {
                pdf: pdf.to_vec(),
                mode: ColorMode::RgbFallback,
                fallback_reason: Some(e.to_string()),
            }
        }
    }
}

async fn run_ghostscript(pdf: &[u8], config: &GhostscriptConfig) -> Result<Vec<u8>, PressError> {
    // Scoped workspace: removed when `dir` drops, on every exit path.
    let dir = tempfile::tempdir()?;
    let input = dir.path().join("input.pdf");
    let output = dir.path().join("output.pdf");
    tokio::fs::write(&input, pdf).await?;

    let mut cmd = Command::new(&config.binary);
    cmd.arg("-dBATCH")
        .arg("-dNOPAUSE")
        .arg("-dSAFER")
        .arg("-sDEVICE=pdfwrite")
        .arg("-sColorConversionStrategy=CMYK")
        .arg("-dProcessColorModel=/DeviceCMYK")
        // pdfwrite keeps vector content as vectors; these keep the
        // press-relevant metadata with it.
        .arg("-dPreserveOverprintSettings=true")
        .arg("-dPreserveHalftoneInfo=true")
        .arg("-dDownsampleColorImages=false")
        .arg("-dAutoRotatePages=/None");
    if let Some(profile) = &config.icc_profile {
        cmd.arg("-dOverrideICC");
        cmd.arg(format!("-sOutputICCProfile={}", profile.display()));
    }
    cmd.arg("-o")
        .arg(&output)
        .arg(&input)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let child = cmd.spawn()?;
    let result = tokio::time::timeout(config.timeout, child.wait_with_output())
        .await
        .map_err(|_| {
            PressError::Other(format!(
                "ghostscript timed out after {}s",
                config.timeout.as_secs()
            ))
        })??;

    if !result.status.success() {
        return Err(PressError::Other(format!(
            "ghostscript exited with {}: {}",
            result.status,
            String::from_utf8_lossy(&result.stderr).trim()
        )));
    }

    let bytes = tokio::fs::read(&output).await?;
    if bytes.is_empty() {
        return Err(PressError::Other("ghostscript produced an empty file".into()));
    }
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compose::tests::sample_pdf_bytes;

    fn unavailable_tool() -> GhostscriptConfig {
        GhostscriptConfig {
            binary: PathBuf::from("/nonexistent/ghostscript"),
            icc_profile: None,
            timeout: Duration::from_secs(5),
        }
    }

    #[tokio::test]
    async fn missing_tool_falls_back_to_rgb_input() {
        let input = sample_pdf_bytes(1, "Card");
        let outcome = convert_to_cmyk(&input, &unavailable_tool()).await;
        assert_eq!(outcome.mode, ColorMode::RgbFallback);
        assert_eq!(outcome.pdf, input);
        assert!(outcome.fallback_reason.is_some());
    }

    #[tokio::test]
    async fn probe_reports_missing_binary() {
        assert!(!unavailable_tool().probe().await);
    }

    #[test]
    fn color_mode_header_values() {
        assert_eq!(ColorMode::Cmyk.as_str(), "cmyk");
        assert_eq!(ColorMode::RgbFallback.as_str(), "rgb-fallback");
    }
}
