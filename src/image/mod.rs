pub mod gray;
pub mod io;
pub mod rgb;
pub mod traits;

pub use self::gray::GrayImage;
pub use self::rgb::{RgbImage, RgbView, CHANNELS};
pub use self::traits::{ImageView, ImageViewMut, Rows};
