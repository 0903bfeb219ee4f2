//! Tesseract command-line engine.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use image::GrayImage;
use tempfile::NamedTempFile;
use tokio::process::Command;
use tracing::debug;

use crate::error::OcrError;
use crate::models::config::RecognitionConfig;

use super::engine::TextRecognizer;
use super::{RecognitionOptions, RecognizedText, TextSpan};

/// Runs the `tesseract` executable once per request.
///
/// The raster is written to a temporary PNG and the TSV report is read from
/// stdout. The child process is killed if the request future is dropped,
/// which is what happens when the queue times a request out.
#[derive(Debug, Clone)]
pub struct TesseractCli {
    executable: PathBuf,
    tessdata_dir: Option<PathBuf>,
}

impl TesseractCli {
    /// Use `tesseract` from `PATH`.
    pub fn new() -> Self {
        Self {
            executable: PathBuf::from("tesseract"),
            tessdata_dir: None,
        }
    }

    /// Build from recognition configuration.
    pub fn from_config(config: &RecognitionConfig) -> Self {
        Self {
            executable: config
                .tesseract_path
                .clone()
                .unwrap_or_else(|| PathBuf::from("tesseract")),
            tessdata_dir: config.tessdata_dir.clone(),
        }
    }

    /// Use a specific executable.
    pub fn with_executable(mut self, path: impl Into<PathBuf>) -> Self {
        self.executable = path.into();
        self
    }

    /// Use a specific traineddata directory.
    pub fn with_tessdata_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.tessdata_dir = Some(dir.into());
        self
    }

    /// Executable path.
    pub fn executable(&self) -> &Path {
        &self.executable
    }

    /// Engine version line, e.g. `tesseract 5.3.4`.
    pub async fn engine_version(&self) -> Result<String, OcrError> {
        let stdout = self.run(&["--version"]).await?;
        stdout
            .lines()
            .next()
            .map(|line| line.trim().to_string())
            .ok_or_else(|| OcrError::EngineUnavailable("empty version output".to_string()))
    }

    /// Installed language packs.
    pub async fn list_languages(&self) -> Result<Vec<String>, OcrError> {
        let mut args = vec!["--list-langs".to_string()];
        if let Some(dir) = &self.tessdata_dir {
            args.push("--tessdata-dir".to_string());
            args.push(dir.to_string_lossy().to_string());
        }
        let args: Vec<&str> = args.iter().map(String::as_str).collect();
        let stdout = self.run(&args).await?;

        // First line is a "List of available languages" header
        Ok(stdout
            .lines()
            .skip(1)
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(str::to_string)
            .collect())
    }

    async fn run(&self, args: &[&str]) -> Result<String, OcrError> {
        let output = Command::new(&self.executable)
            .args(args)
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| self.spawn_error(e))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(OcrError::Recognition(format!("tesseract failed: {}", stderr.trim())));
        }

        // Older releases print the version banner to stderr
        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        if stdout.trim().is_empty() {
            return Ok(String::from_utf8_lossy(&output.stderr).to_string());
        }
        Ok(stdout)
    }

    fn spawn_error(&self, e: std::io::Error) -> OcrError {
        OcrError::EngineUnavailable(format!("{}: {}", self.executable.display(), e))
    }
}

impl Default for TesseractCli {
    fn default() -> Self {
        Self::new()
    }
}

impl TextRecognizer for TesseractCli {
    fn name(&self) -> &str {
        "tesseract"
    }

    async fn recognize(
        &mut self,
        image: &GrayImage,
        options: &RecognitionOptions,
    ) -> Result<RecognizedText, OcrError> {
        let input = NamedTempFile::with_suffix(".png")
            .map_err(|e| OcrError::Recognition(format!("failed to create temp file: {}", e)))?;
        image
            .save(input.path())
            .map_err(|e| OcrError::Recognition(format!("failed to write raster: {}", e)))?;

        let mut command = Command::new(&self.executable);
        command
            .arg(input.path())
            .arg("stdout")
            .arg("-l")
            .arg(&options.language)
            .arg("--psm")
            .arg(options.page_segmentation.mode().to_string());
        if let Some(dir) = &self.tessdata_dir {
            command.arg("--tessdata-dir").arg(dir);
        }
        command.arg("tsv");

        debug!(
            "Running tesseract on {}x{} raster (lang={}, psm={})",
            image.width(),
            image.height(),
            options.language,
            options.page_segmentation.mode()
        );

        let output = command
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| self.spawn_error(e))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(OcrError::Recognition(format!("tesseract failed: {}", stderr.trim())));
        }

        Ok(parse_tsv(&String::from_utf8_lossy(&output.stdout)))
    }
}

/// Parse a Tesseract TSV report.
///
/// Word rows (level 5) are grouped into lines by block, paragraph and line
/// number. Each line becomes one span whose confidence is the mean of its
/// words; the text is the lines joined with newlines.
pub fn parse_tsv(tsv: &str) -> RecognizedText {
    let mut spans: Vec<TextSpan> = Vec::new();
    let mut current_key: Option<(i32, i32, i32)> = None;
    let mut words: Vec<&str> = Vec::new();
    let mut conf_sum = 0.0f32;

    let mut flush = |words: &mut Vec<&str>, conf_sum: &mut f32| {
        if !words.is_empty() {
            spans.push(TextSpan {
                text: words.join(" "),
                confidence: *conf_sum / words.len() as f32,
            });
        }
        words.clear();
        *conf_sum = 0.0;
    };

    // Skip header
    for row in tsv.lines().skip(1) {
        // level, page_num, block_num, par_num, line_num, word_num,
        // left, top, width, height, conf, text
        let fields: Vec<&str> = row.split('\t').collect();
        if fields.len() < 12 {
            continue;
        }

        let level: i32 = fields[0].parse().unwrap_or(-1);
        if level != 5 {
            continue;
        }

        let text = fields[11].trim();
        let conf: f32 = fields[10].trim().parse().unwrap_or(-1.0);
        if text.is_empty() || conf < 0.0 {
            continue;
        }

        let key = (
            fields[2].parse().unwrap_or(-1),
            fields[3].parse().unwrap_or(-1),
            fields[4].parse().unwrap_or(-1),
        );
        if current_key != Some(key) {
            flush(&mut words, &mut conf_sum);
            current_key = Some(key);
        }

        words.push(text);
        conf_sum += conf;
    }
    flush(&mut words, &mut conf_sum);

    let text = spans
        .iter()
        .map(|s| s.text.as_str())
        .collect::<Vec<_>>()
        .join("\n");

    RecognizedText { text, spans }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const HEADER: &str =
        "level\tpage_num\tblock_num\tpar_num\tline_num\tword_num\tleft\ttop\twidth\theight\tconf\ttext";

    fn word(block: u32, line: u32, n: u32, conf: f32, text: &str) -> String {
        format!("5\t1\t{block}\t1\t{line}\t{n}\t0\t0\t10\t10\t{conf}\t{text}")
    }

    #[test]
    fn test_parse_tsv_groups_lines() {
        let tsv = [
            HEADER.to_string(),
            "1\t1\t0\t0\t0\t0\t0\t0\t640\t480\t-1\t".to_string(),
            word(1, 1, 1, 90.0, "공격력"),
            word(1, 1, 2, 80.0, "1,234"),
            word(1, 2, 1, 70.0, "전투"),
            word(1, 2, 2, 60.0, "속도"),
            word(1, 2, 3, 50.0, "24.2%"),
        ]
        .join("\n");

        let result = parse_tsv(&tsv);
        assert_eq!(result.text, "공격력 1,234\n전투 속도 24.2%");
        assert_eq!(result.spans.len(), 2);
        assert_eq!(result.spans[0].confidence, 85.0);
        assert_eq!(result.spans[1].confidence, 60.0);
    }

    #[test]
    fn test_parse_tsv_separates_blocks_with_same_line_number() {
        let tsv = [
            HEADER.to_string(),
            word(1, 1, 1, 90.0, "명중"),
            word(2, 1, 1, 90.0, "회피"),
        ]
        .join("\n");

        assert_eq!(parse_tsv(&tsv).text, "명중\n회피");
    }

    #[test]
    fn test_parse_tsv_skips_empty_and_malformed_rows() {
        let tsv = [
            HEADER.to_string(),
            word(1, 1, 1, -1.0, ""),
            "garbage".to_string(),
            word(1, 1, 2, 95.0, "행동력"),
        ]
        .join("\n");

        let result = parse_tsv(&tsv);
        assert_eq!(result.text, "행동력");
        assert_eq!(result.spans.len(), 1);
    }

    #[test]
    fn test_parse_empty_report() {
        assert_eq!(parse_tsv(""), RecognizedText::default());
        assert_eq!(parse_tsv(HEADER), RecognizedText::default());
    }

    #[tokio::test]
    async fn test_missing_executable_is_unavailable() {
        let mut engine = TesseractCli::new().with_executable("/nonexistent/tesseract-binary");
        let image = GrayImage::new(4, 4);

        let err = engine
            .recognize(&image, &RecognitionOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, OcrError::EngineUnavailable(_)));
    }
}
