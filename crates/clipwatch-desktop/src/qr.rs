//! QR code rendering for the terminal.

use qrcode::render::unicode::Dense1x2;
use qrcode::types::QrError;
use qrcode::QrCode;
use thiserror::Error;

/// Error returned when text cannot be encoded as a QR code.
#[derive(Debug, Error)]
#[error("cannot encode QR code: {0}")]
pub struct QrRenderError(#[from] QrError);

/// Render `text` as a QR code made of Unicode half blocks.
///
/// Colors are inverted so the code scans on a dark terminal background.
///
/// # Errors
///
/// Returns an error if the text is too long to fit in a QR code.
pub fn render_qr(text: &str) -> Result<String, QrRenderError> {
    let code = QrCode::new(text.as_bytes())?;
    Ok(code
        .render::<Dense1x2>()
        .dark_color(Dense1x2::Light)
        .light_color(Dense1x2::Dark)
        .quiet_zone(true)
        .build())
}
