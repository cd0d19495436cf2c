//! Contract bindings used by the plugins
//!
//! Only the entry points the plugins call are declared. Calls are encoded
//! locally and handed to the wallet client as raw calldata.

use alloy::sol;

sol! {
    interface IERC20 {
        function approve(address spender, uint256 amount) external returns (bool);
    }

    #[derive(Debug, PartialEq, Eq)]
    struct MarketParams {
        address loanToken;
        address collateralToken;
        address oracle;
        address irm;
        uint256 lltv;
    }

    interface IMorpho {
        function supply(
            MarketParams memory marketParams,
            uint256 assets,
            uint256 shares,
            address onBehalf,
            bytes memory data
        ) external returns (uint256 assetsSupplied, uint256 sharesSupplied);

        function withdraw(
            MarketParams memory marketParams,
            uint256 assets,
            uint256 shares,
            address onBehalf,
            address receiver
        ) external returns (uint256 assetsWithdrawn, uint256 sharesWithdrawn);

        function borrow(
            MarketParams memory marketParams,
            uint256 assets,
            uint256 shares,
            address onBehalf,
            address receiver
        ) external returns (uint256 assetsBorrowed, uint256 sharesBorrowed);

        function repay(
            MarketParams memory marketParams,
            uint256 assets,
            uint256 shares,
            address onBehalf,
            bytes memory data
        ) external returns (uint256 assetsRepaid, uint256 sharesRepaid);

        function supplyCollateral(
            MarketParams memory marketParams,
            uint256 assets,
            address onBehalf,
            bytes memory data
        ) external;

        function withdrawCollateral(
            MarketParams memory marketParams,
            uint256 assets,
            address onBehalf,
            address receiver
        ) external;

        function position(bytes32 id, address user)
            external
            view
            returns (uint256 supplyShares, uint128 borrowShares, uint128 collateral);

        function market(bytes32 id)
            external
            view
            returns (
                uint128 totalSupplyAssets,
                uint128 totalSupplyShares,
                uint128 totalBorrowAssets,
                uint128 totalBorrowShares,
                uint128 lastUpdate,
                uint128 fee
            );

        function idToMarketParams(bytes32 id)
            external
            view
            returns (
                address loanToken,
                address collateralToken,
                address oracle,
                address irm,
                uint256 lltv
            );
    }
}
