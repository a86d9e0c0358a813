use alloy::primitives::{address, Address};
use alloy::sol;

/// Fixed-price sale contract accepting the two stablecoins.
pub const SALE_CONTRACT_ADDRESS: Address = address!("277bfd5b92cda825783319fcdba6e637dc181021");

pub const USDT_ADDRESS: Address = address!("6f4948c484f6defc986c136562d98dfb3280ec18");
pub const USDC_ADDRESS: Address = address!("1e44331ca731afb1da8a4b75a9f5e32199b15942");

/// Both supported tokens are deployed with 18 decimals on the sale chain.
pub const TOKEN_DECIMALS: u8 = 18;

sol! {
    #[sol(rpc)]
    interface IERC20 {
        function balanceOf(address owner) external view returns (uint256);
        function allowance(address owner, address spender) external view returns (uint256);
        function approve(address spender, uint256 amount) external;
    }
}

sol! {
    #[sol(rpc)]
    interface ISale {
        function buy(address currency, uint256 amount) external;
    }
}
