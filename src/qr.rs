use std::io::Cursor;

use image::{ImageFormat, Luma};
use qrcode::QrCode;

use crate::error::PassError;

/// Render `content` as a QR code and encode it as PNG, entirely in memory.
pub fn render_png(content: &str) -> Result<Vec<u8>, PassError> {
    let code = QrCode::new(content.as_bytes())
        .map_err(|e| PassError::QrRenderError(e.to_string()))?;

    let img = code.render::<Luma<u8>>().build();
    let mut buffer = Vec::new();
    img.write_to(&mut Cursor::new(&mut buffer), ImageFormat::Png)
        .map_err(|e| PassError::QrRenderError(e.to_string()))?;

    Ok(buffer)
}
