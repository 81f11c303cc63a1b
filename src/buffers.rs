mod bindable;
mod descriptor_set;
mod mapped_uniform_buffer;
mod storage_buffer;
mod texture;

pub use self::bindable::*;
pub use self::descriptor_set::*;
pub use self::mapped_uniform_buffer::*;
pub use self::storage_buffer::*;
pub use self::texture::*;
