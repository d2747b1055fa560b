//! Supported catalogs and download methods.

use std::fmt;

use serde::{Deserialize, Serialize};

/// HERE catalogs the downloader knows how to tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Catalog {
    /// HERE Map Content, road and intersection basics.
    #[serde(rename = "HMC_RIB_2")]
    HmcRib2,
    /// HD Live Map, Western Europe.
    #[serde(rename = "HDLM_WEU_2")]
    HdlmWeu2,
    /// HERE Map Content external references.
    #[serde(rename = "HMC_EXT_REF_2")]
    HmcExtRef2,
}

impl Catalog {
    pub const ALL: [Catalog; 3] = [Catalog::HmcRib2, Catalog::HdlmWeu2, Catalog::HmcExtRef2];

    /// Identifier as written in configuration files.
    pub fn name(&self) -> &'static str {
        match self {
            Catalog::HmcRib2 => "HMC_RIB_2",
            Catalog::HdlmWeu2 => "HDLM_WEU_2",
            Catalog::HmcExtRef2 => "HMC_EXT_REF_2",
        }
    }

    /// HERE Resource Name of the catalog.
    pub fn hrn(&self) -> &'static str {
        match self {
            Catalog::HmcRib2 => "hrn:here:data::olp-here:rib-2",
            Catalog::HdlmWeu2 => "hrn:here:data::olp-here-had:here-hdlm-protobuf-weu-2",
            Catalog::HmcExtRef2 => "hrn:here:data::olp-here:rib-external-references-2",
        }
    }

    /// Tiling level the catalog's layers are partitioned at.
    pub fn tile_level(&self) -> u8 {
        match self {
            Catalog::HmcRib2 | Catalog::HmcExtRef2 => 12,
            Catalog::HdlmWeu2 => 14,
        }
    }
}

impl fmt::Display for Catalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// How partitions are fetched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DownloadMethod {
    /// HERE Data API over HTTPS.
    #[serde(rename = "DATA_SDK")]
    DataSdk,
    /// The `olp` command line tool.
    #[serde(rename = "OLP_CLI")]
    OlpCli,
}

impl fmt::Display for DownloadMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DownloadMethod::DataSdk => f.write_str("DATA_SDK"),
            DownloadMethod::OlpCli => f.write_str("OLP_CLI"),
        }
    }
}
