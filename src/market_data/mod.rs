pub mod candle;
pub mod series;

pub use candle::Candle;
pub use series::OhlcvSeries;
