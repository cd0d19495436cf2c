//! Morpho Blue lending adapter

pub mod decode;
pub mod deployments;
pub mod params;
pub mod service;

pub use decode::{MarketInfo, MarketParamsView, Position};
pub use deployments::{MorphoDeployments, MORPHO_BLUE};
pub use params::{
    BorrowParameters, LendingRequest, MarketInfoParameters, MarketPositionParameters,
    RepayParameters, SupplyCollateralParameters, SupplyParameters, WithdrawCollateralParameters,
    WithdrawParameters,
};
pub use service::MorphoService;
