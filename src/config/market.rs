//! Shared market configuration: per-chain gas tiers, bridge routes and the
//! venue -> chain map. One `MarketTables` value is built once and handed to
//! the fee model and detector; nothing in the crate re-declares these tables.

use crate::error::ArbError;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Chain assumed for venues missing from the venue map.
pub const DEFAULT_CHAIN: &str = "ethereum";

/// Gas price tiers for one chain, in gwei.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GasTiers {
    #[serde(default)]
    pub standard: Option<Decimal>,
    #[serde(default)]
    pub fast: Option<Decimal>,
    #[serde(default)]
    pub instant: Option<Decimal>,
}

impl GasTiers {
    pub fn new(standard: Decimal, fast: Decimal, instant: Decimal) -> Self {
        Self {
            standard: Some(standard),
            fast: Some(fast),
            instant: Some(instant),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChainGasTable(HashMap<String, GasTiers>);

impl ChainGasTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, chain: &str, tiers: GasTiers) {
        self.0.insert(chain.to_lowercase(), tiers);
    }

    pub fn get(&self, chain: &str) -> Option<&GasTiers> {
        self.0.get(&chain.to_lowercase())
    }

    /// `fast` tier for the chain, if both the chain and the tier are known.
    pub fn fast_gwei(&self, chain: &str) -> Option<Decimal> {
        self.get(chain).and_then(|tiers| tiers.fast)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Fee and settlement delay for moving value from one chain to another.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BridgeRoute {
    pub fee_pct: Decimal,
    pub time_minutes: u64,
}

/// On-disk form of one bridge route.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BridgeRecord {
    pub from: String,
    pub to: String,
    pub fee_pct: Decimal,
    pub time_minutes: u64,
}

/// Ordered `(source, destination)` chain pair -> bridge route.
/// Serialized as a list of `{from, to, fee_pct, time_minutes}` records.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<BridgeRecord>", into = "Vec<BridgeRecord>")]
pub struct BridgeCostTable(HashMap<(String, String), BridgeRoute>);

impl BridgeCostTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, from: &str, to: &str, route: BridgeRoute) {
        self.0
            .insert((from.to_lowercase(), to.to_lowercase()), route);
    }

    /// Direction matters: a reverse route needs its own entry.
    pub fn get(&self, from: &str, to: &str) -> Option<&BridgeRoute> {
        self.0.get(&(from.to_lowercase(), to.to_lowercase()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<BridgeRecord>> for BridgeCostTable {
    fn from(records: Vec<BridgeRecord>) -> Self {
        let mut table = BridgeCostTable::new();
        for record in records {
            table.insert(
                &record.from,
                &record.to,
                BridgeRoute {
                    fee_pct: record.fee_pct,
                    time_minutes: record.time_minutes,
                },
            );
        }
        table
    }
}

impl From<BridgeCostTable> for Vec<BridgeRecord> {
    fn from(table: BridgeCostTable) -> Self {
        let mut records: Vec<BridgeRecord> = table
            .0
            .into_iter()
            .map(|((from, to), route)| BridgeRecord {
                from,
                to,
                fee_pct: route.fee_pct,
                time_minutes: route.time_minutes,
            })
            .collect();
        records.sort_by(|a, b| (&a.from, &a.to).cmp(&(&b.from, &b.to)));
        records
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VenueChainMap(HashMap<String, String>);

impl VenueChainMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, venue: &str, chain: &str) {
        self.0.insert(venue.to_lowercase(), chain.to_lowercase());
    }

    pub fn get(&self, venue: &str) -> Option<&str> {
        self.0.get(&venue.to_lowercase()).map(String::as_str)
    }

    /// Chain for a venue. Unknown venues resolve to `ethereum`, which hides
    /// real cross-chain routes for them; callers that care should map every venue.
    pub fn resolve(&self, venue: &str) -> &str {
        match self.get(venue) {
            Some(chain) => chain,
            None => {
                log::debug!(
                    "Venue '{}' has no chain mapping, assuming {}",
                    venue,
                    DEFAULT_CHAIN
                );
                DEFAULT_CHAIN
            }
        }
    }
}

/// Everything the cost model needs besides the quotes themselves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketTables {
    #[serde(default)]
    pub chain_gas: ChainGasTable,
    #[serde(default)]
    pub bridges: BridgeCostTable,
    #[serde(default)]
    pub venue_chains: VenueChainMap,
}

impl MarketTables {
    pub fn empty() -> Self {
        Self {
            chain_gas: ChainGasTable::new(),
            bridges: BridgeCostTable::new(),
            venue_chains: VenueChainMap::new(),
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self, ArbError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, ArbError> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        let tables = Self::from_json_str(&raw)?;
        log::info!(
            "Loaded market tables from {}: {} chains, {} bridge routes",
            path.as_ref().display(),
            tables.chain_gas.len(),
            tables.bridges.len()
        );
        Ok(tables)
    }
}

impl Default for MarketTables {
    fn default() -> Self {
        let mut chain_gas = ChainGasTable::new();
        chain_gas.insert("ethereum", GasTiers::new(dec!(20), dec!(25), dec!(35)));
        chain_gas.insert("bsc", GasTiers::new(dec!(3), dec!(5), dec!(7)));
        chain_gas.insert("polygon", GasTiers::new(dec!(30), dec!(40), dec!(60)));
        chain_gas.insert("arbitrum", GasTiers::new(dec!(0.1), dec!(0.1), dec!(0.2)));
        chain_gas.insert("optimism", GasTiers::new(dec!(0.01), dec!(0.02), dec!(0.05)));
        chain_gas.insert("base", GasTiers::new(dec!(0.01), dec!(0.02), dec!(0.05)));
        chain_gas.insert("avalanche", GasTiers::new(dec!(25), dec!(30), dec!(40)));

        let mut bridges = BridgeCostTable::new();
        let routes: [(&str, &str, Decimal, u64); 10] = [
            ("ethereum", "arbitrum", dec!(0.05), 15),
            ("arbitrum", "ethereum", dec!(0.1), 20),
            ("ethereum", "optimism", dec!(0.05), 15),
            ("optimism", "ethereum", dec!(0.1), 20),
            ("ethereum", "polygon", dec!(0.1), 30),
            ("polygon", "ethereum", dec!(0.1), 45),
            ("ethereum", "base", dec!(0.05), 15),
            ("base", "ethereum", dec!(0.1), 20),
            ("ethereum", "bsc", dec!(0.1), 10),
            ("bsc", "ethereum", dec!(0.1), 10),
        ];
        for (from, to, fee_pct, time_minutes) in routes {
            bridges.insert(
                from,
                to,
                BridgeRoute {
                    fee_pct,
                    time_minutes,
                },
            );
        }

        let mut venue_chains = VenueChainMap::new();
        for (venue, chain) in [
            ("uniswap", "ethereum"),
            ("sushiswap", "ethereum"),
            ("curve", "ethereum"),
            ("balancer", "ethereum"),
            ("1inch", "ethereum"),
            ("openocean", "ethereum"),
            ("pancakeswap", "bsc"),
            ("biswap", "bsc"),
            ("quickswap", "polygon"),
            ("camelot", "arbitrum"),
            ("velodrome", "optimism"),
            ("aerodrome", "base"),
            ("traderjoe", "avalanche"),
        ] {
            venue_chains.insert(venue, chain);
        }

        Self {
            chain_gas,
            bridges,
            venue_chains,
        }
    }
}
