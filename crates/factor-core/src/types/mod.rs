//! 분석 파이프라인 전반에서 사용되는 공통 타입.

mod asset;
mod period;
mod series;
mod table;

pub use asset::*;
pub use period::*;
pub use series::*;
pub use table::*;
