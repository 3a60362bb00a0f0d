//! Contract bindings for the range AMM surface this SDK drives: the pair
//! factory, the pool itself (read-only here), the position manager that every
//! mutation batch targets, and the minimal ERC-20 surface needed for
//! allowances.

use alloy::sol;

sol! {
    contract RangeFactory {
        /// Returns the pool for an (unordered) token pair, or the zero
        /// address when no pool has been deployed.
        function getPool(address tokenA, address tokenB) external view returns (address pool);
    }

    contract RangePool {
        function slot0() external view returns (uint160 sqrtPriceX96, int24 tick);
        function tickSpacing() external view returns (int24);
        function token0() external view returns (address);
        function token1() external view returns (address);
    }

    contract RangePositionManager {
        struct MintParams {
            address token0;
            address token1;
            int24 tickLower;
            int24 tickUpper;
            uint256 amount0Desired;
            uint256 amount1Desired;
            uint256 amount0Min;
            uint256 amount1Min;
            address recipient;
            uint256 deadline;
        }

        struct IncreaseLiquidityParams {
            uint256 tokenId;
            uint256 amount0Desired;
            uint256 amount1Desired;
            uint256 amount0Min;
            uint256 amount1Min;
            uint256 deadline;
        }

        struct DecreaseLiquidityParams {
            uint256 tokenId;
            uint128 liquidity;
            uint256 amount0Min;
            uint256 amount1Min;
            uint256 deadline;
        }

        struct CollectParams {
            uint256 tokenId;
            address recipient;
            uint128 amount0Max;
            uint128 amount1Max;
        }

        function positions(uint256 tokenId)
            external
            view
            returns (
                address operator,
                address token0,
                address token1,
                int24 tickLower,
                int24 tickUpper,
                uint128 liquidity,
                uint256 feeGrowthInside0LastX128,
                uint256 feeGrowthInside1LastX128,
                uint128 tokensOwed0,
                uint128 tokensOwed1
            );

        function mint(MintParams calldata params)
            external
            returns (uint256 tokenId, uint128 liquidity, uint256 amount0, uint256 amount1);

        function increaseLiquidity(IncreaseLiquidityParams calldata params)
            external
            returns (uint128 liquidity, uint256 amount0, uint256 amount1);

        function decreaseLiquidity(DecreaseLiquidityParams calldata params)
            external
            returns (uint256 amount0, uint256 amount1);

        function collect(CollectParams calldata params)
            external
            returns (uint256 amount0, uint256 amount1);

        function burn(uint256 tokenId) external;

        event IncreaseLiquidity(uint256 indexed tokenId, uint128 liquidity, uint256 amount0, uint256 amount1);
        event DecreaseLiquidity(uint256 indexed tokenId, uint128 liquidity, uint256 amount0, uint256 amount1);
        event Collect(uint256 indexed tokenId, address recipient, uint256 amount0, uint256 amount1);
    }

    contract ERC20 {
        function decimals() external view returns (uint8);
        function balanceOf(address owner) external view returns (uint256);
        function allowance(address owner, address spender) external view returns (uint256);
        function approve(address spender, uint256 amount) external returns (bool);
    }
}
