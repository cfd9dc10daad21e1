//! Client-side file synthesis. The shell turns an [`ExportFile`] into a blob
//! and clicks a download anchor; nothing is streamed.

use std::io::Cursor;
use std::path::Path;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::{ExtendedColorType, ImageEncoder};
use serde::Serialize;

#[derive(Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ExportFile {
    pub file_name: String,
    pub mime: String,
    pub data_base64: String,
    pub data_url: String,
}

impl ExportFile {
    fn from_bytes(file_name: String, mime: &str, bytes: &[u8]) -> Self {
        let data_base64 = STANDARD.encode(bytes);
        let data_url = format!("data:{mime};base64,{data_base64}");
        Self {
            file_name,
            mime: mime.to_string(),
            data_base64,
            data_url,
        }
    }

    pub fn bytes(&self) -> Result<Vec<u8>, String> {
        STANDARD
            .decode(self.data_base64.as_bytes())
            .map_err(|err| err.to_string())
    }
}

/// Keeps the stem of a user-supplied name and forces the extension.
pub fn sanitize_file_name(original: &str, fallback: &str, ext: &str) -> String {
    let path = Path::new(original.trim());
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .filter(|s| !s.trim().is_empty())
        .unwrap_or(fallback);
    let safe_stem: String = stem
        .chars()
        .map(|ch| match ch {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            other => other,
        })
        .collect();
    format!("{safe_stem}.{ext}")
}

pub fn export_text(file_name: &str, content: &str) -> ExportFile {
    ExportFile::from_bytes(
        sanitize_file_name(file_name, "notes", "txt"),
        "text/plain;charset=utf-8",
        content.as_bytes(),
    )
}

pub fn export_csv(
    file_name: &str,
    headers: &[String],
    rows: &[Vec<String>],
) -> Result<ExportFile, String> {
    let mut writer = csv::WriterBuilder::new().from_writer(Vec::new());
    if !headers.is_empty() {
        writer.write_record(headers).map_err(|err| err.to_string())?;
    }
    for row in rows {
        if !headers.is_empty() && row.len() != headers.len() {
            return Err(format!(
                "row has {} fields but there are {} headers",
                row.len(),
                headers.len()
            ));
        }
        writer.write_record(row).map_err(|err| err.to_string())?;
    }
    let bytes = writer.into_inner().map_err(|err| err.to_string())?;
    Ok(ExportFile::from_bytes(
        sanitize_file_name(file_name, "export", "csv"),
        "text/csv;charset=utf-8",
        &bytes,
    ))
}

/// Encodes an RGBA8 buffer, e.g. a canvas `ImageData`, as PNG.
pub fn export_png(
    file_name: &str,
    width: u32,
    height: u32,
    rgba: &[u8],
) -> Result<ExportFile, String> {
    if width == 0 || height == 0 {
        return Err("image dimensions must be non-zero".into());
    }
    let expected = (width as usize)
        .checked_mul(height as usize)
        .and_then(|pixels| pixels.checked_mul(4))
        .ok_or_else(|| "image is too large".to_string())?;
    if rgba.len() != expected {
        return Err(format!(
            "expected {expected} RGBA bytes for {width}x{height}, got {}",
            rgba.len()
        ));
    }
    let mut buffer = Vec::new();
    let encoder = PngEncoder::new_with_quality(
        Cursor::new(&mut buffer),
        CompressionType::Default,
        FilterType::Adaptive,
    );
    encoder
        .write_image(rgba, width, height, ExtendedColorType::Rgba8)
        .map_err(|err| format!("failed to encode PNG: {err}"))?;
    Ok(ExportFile::from_bytes(
        sanitize_file_name(file_name, "image", "png"),
        "image/png",
        &buffer,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_keep_stem_and_force_extension() {
        assert_eq!(sanitize_file_name("report.xlsx", "x", "csv"), "report.csv");
        assert_eq!(sanitize_file_name("  ", "export", "csv"), "export.csv");
        assert_eq!(sanitize_file_name("a/b/c.txt", "x", "txt"), "c.txt");
        assert_eq!(sanitize_file_name("what?.txt", "x", "txt"), "what_.txt");
    }

    #[test]
    fn text_export_preserves_content() {
        let file = export_text("draft", "héllo\nworld");
        assert_eq!(file.file_name, "draft.txt");
        assert_eq!(file.bytes().unwrap(), "héllo\nworld".as_bytes());
        assert!(file.data_url.starts_with("data:text/plain;charset=utf-8;base64,"));
    }

    #[test]
    fn csv_export_quotes_fields() {
        let headers = vec!["name".to_string(), "note".to_string()];
        let rows = vec![vec!["Ann".to_string(), "likes, commas".to_string()]];
        let file = export_csv("people", &headers, &rows).unwrap();
        let text = String::from_utf8(file.bytes().unwrap()).unwrap();
        assert_eq!(text, "name,note\nAnn,\"likes, commas\"\n");
    }

    #[test]
    fn csv_export_rejects_ragged_rows() {
        let headers = vec!["a".to_string(), "b".to_string()];
        let rows = vec![vec!["1".to_string()]];
        assert!(export_csv("x", &headers, &rows).is_err());
    }

    #[test]
    fn png_export_writes_signature() {
        let pixels = vec![255u8; 2 * 2 * 4];
        let file = export_png("wheel", 2, 2, &pixels).unwrap();
        let bytes = file.bytes().unwrap();
        assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
        assert!(export_png("wheel", 2, 2, &pixels[..4]).is_err());
        assert!(export_png("wheel", 0, 2, &[]).is_err());
    }

    #[test]
    fn png_export_rejects_oversized_dimensions() {
        assert_eq!(
            export_png("huge", u32::MAX, u32::MAX, &[]),
            Err("image is too large".to_string())
        );
        let err = export_png("tall", 1, 40_000, &[0; 16]).unwrap_err();
        assert!(err.contains("expected 160000 RGBA bytes"), "msg: {err}");
    }
}
