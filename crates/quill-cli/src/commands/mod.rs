pub mod count;
pub mod dispatch;
pub mod entries;
pub mod export;
pub mod labels;
pub mod shared;
