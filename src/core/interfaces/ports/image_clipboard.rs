use anyhow::Result;

use crate::core::models::DisplayedImage;

pub trait ImageClipboard: Send + Sync {
    fn copy_image(&self, image: &DisplayedImage) -> Result<()>;
}
