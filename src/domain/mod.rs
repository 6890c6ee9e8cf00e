//! Domain層: ビジネスロジックの中心
//!
//! アクションコードの変換、人間挙動シミュレーション、画面レイアウト、
//! 外部境界のtrait定義。Applicationから注入され、Infrastructure
//! （またはホスト側アダプタ）で実装される。

pub mod codec;
pub mod config;
pub mod error;
pub mod humanize;
pub mod layout;
pub mod ports;
pub mod types;

pub use codec::*;
pub use config::*;
pub use error::*;
pub use humanize::*;
pub use layout::*;
pub use ports::*;
pub use types::*;
