//! Cost-model configuration that downstream crates can serialize/deserialize.
//!
//! Every constant of the model (throughputs, emission and price rates, index
//! residency, key overhead, primitive value sizes) lives here and is passed
//! explicitly into the size model and the cost formula.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::schema::PrimitiveType;

/// Value bytes charged per primitive type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TypeSizes {
    pub integer: u64,
    pub number: u64,
    pub string: u64,
    pub longstring: u64,
    pub date: u64,
}

impl Default for TypeSizes {
    fn default() -> Self {
        Self {
            integer: 8,
            number: 8,
            string: 80,
            longstring: 200,
            date: 20,
        }
    }
}

impl TypeSizes {
    pub fn size_of(&self, ty: PrimitiveType) -> u64 {
        match ty {
            PrimitiveType::Integer => self.integer,
            PrimitiveType::Number => self.number,
            PrimitiveType::String => self.string,
            PrimitiveType::LongString => self.longstring,
            PrimitiveType::Date => self.date,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CostConfig {
    /// Network throughput in bytes per second.
    pub bandwidth_bps: u64,

    /// RAM scan throughput in bytes per second.
    pub ram_bps: u64,

    /// CO2-equivalent mass per GB moved over the network.
    pub co2_network_rate: f64,

    /// CO2-equivalent mass per GB of RAM touched.
    pub co2_ram_rate: f64,

    /// Price per GB of network egress. RAM is not priced.
    pub price_rate: f64,

    /// Resident size of one local index, in bytes.
    pub index_size_bytes: u64,

    /// Fixed serialization cost of one key/attribute slot.
    pub key_overhead_bytes: u64,

    pub type_sizes: TypeSizes,
}

impl Default for CostConfig {
    fn default() -> Self {
        Self {
            bandwidth_bps: 100_000_000,    // 100 MB/s
            ram_bps: 25_000_000_000,       // 25 GB/s
            co2_network_rate: 0.0110,
            co2_ram_rate: 0.0280,
            price_rate: 0.011,
            index_size_bytes: 1_000_000, // 1 MB
            key_overhead_bytes: 12,
            type_sizes: TypeSizes::default(),
        }
    }
}

impl CostConfig {
    /// Create a config from environment variables, falling back to defaults.
    ///
    /// Environment variables:
    /// - `SHARDCOST_BANDWIDTH_BPS`: network throughput (bytes/s)
    /// - `SHARDCOST_RAM_BPS`: RAM throughput (bytes/s)
    /// - `SHARDCOST_CO2_NETWORK_RATE`: CO2 per network GB
    /// - `SHARDCOST_CO2_RAM_RATE`: CO2 per RAM GB
    /// - `SHARDCOST_PRICE_RATE`: price per network GB
    /// - `SHARDCOST_INDEX_SIZE_BYTES`: resident index size
    /// - `SHARDCOST_KEY_OVERHEAD_BYTES`: per-key overhead
    pub fn from_env() -> Self {
        let mut cfg = Self::default();
        cfg.apply_env();
        cfg
    }

    /// Overwrite every field whose `SHARDCOST_*` variable is set and parses.
    pub fn apply_env(&mut self) {
        self.apply_vars(|name| std::env::var(name).ok());
    }

    /// Same as [`apply_env`](Self::apply_env) with an explicit variable source.
    pub fn apply_vars<F: Fn(&str) -> Option<String>>(&mut self, lookup: F) {
        fn parsed<T: std::str::FromStr>(raw: Option<String>) -> Option<T> {
            raw.and_then(|s| s.trim().parse::<T>().ok())
        }

        if let Some(v) = parsed(lookup("SHARDCOST_BANDWIDTH_BPS")) {
            self.bandwidth_bps = v;
        }
        if let Some(v) = parsed(lookup("SHARDCOST_RAM_BPS")) {
            self.ram_bps = v;
        }
        if let Some(v) = parsed(lookup("SHARDCOST_CO2_NETWORK_RATE")) {
            self.co2_network_rate = v;
        }
        if let Some(v) = parsed(lookup("SHARDCOST_CO2_RAM_RATE")) {
            self.co2_ram_rate = v;
        }
        if let Some(v) = parsed(lookup("SHARDCOST_PRICE_RATE")) {
            self.price_rate = v;
        }
        if let Some(v) = parsed(lookup("SHARDCOST_INDEX_SIZE_BYTES")) {
            self.index_size_bytes = v;
        }
        if let Some(v) = parsed(lookup("SHARDCOST_KEY_OVERHEAD_BYTES")) {
            self.key_overhead_bytes = v;
        }
    }

    /// Reject tables the formulas cannot divide by or would turn negative.
    pub fn validate(&self) -> Result<()> {
        if self.bandwidth_bps == 0 {
            return Err(Error::Config("bandwidth_bps must be positive".into()));
        }
        if self.ram_bps == 0 {
            return Err(Error::Config("ram_bps must be positive".into()));
        }
        for (name, rate) in [
            ("co2_network_rate", self.co2_network_rate),
            ("co2_ram_rate", self.co2_ram_rate),
            ("price_rate", self.price_rate),
        ] {
            if !rate.is_finite() || rate < 0.0 {
                return Err(Error::Config(format!(
                    "{} must be a finite non-negative number, got {}",
                    name, rate
                )));
            }
        }
        Ok(())
    }

    /// Key overhead plus the value size of `ty`.
    pub fn attribute_size(&self, ty: PrimitiveType) -> u64 {
        self.key_overhead_bytes
            .saturating_add(self.type_sizes.size_of(ty))
    }
}
