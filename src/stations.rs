/// Station and reach registry for the Glen Canyon to Imperial Dam stretch.
///
/// Defines the canonical catalog of USBR HDB release/gauge points and USGS
/// stream gauges, and the table of comparable reaches between them. This is
/// the single source of truth for station identifiers — other modules
/// reference entries from here rather than hardcoding codes, and the catalog
/// is immutable configuration data, never mutated at runtime.
///
/// Sources:
///   - HDB site datatype ids (sdids): USBR HDB web service (usbr.gov/pn-bin/hdb)
///   - USGS site codes: NWIS (waterservices.usgs.gov)
///   - Per-reach lag bounds: observed travel times between release and gauge

// ---------------------------------------------------------------------------
// HDB stations (reservoir operations API)
// ---------------------------------------------------------------------------

/// HDB database namespace a station's data lives in. The lower Colorado,
/// Yuma area office, and upper Colorado systems are served from separate
/// HDB instances selected via the `svr` query parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HdbDatabase {
    LowerColorado,
    YumaAreaOffice,
    UpperColorado,
}

impl HdbDatabase {
    /// Value for the `svr` query parameter.
    pub fn namespace(&self) -> &'static str {
        match self {
            HdbDatabase::LowerColorado => "lchdb",
            HdbDatabase::YumaAreaOffice => "yaohdb",
            HdbDatabase::UpperColorado => "uchdb2",
        }
    }
}

/// A release point or gauge served by the USBR HDB API.
#[derive(Debug, PartialEq, Eq)]
pub struct HdbStation {
    /// HDB site datatype id — the `sdi` query parameter.
    pub sdid: &'static str,
    /// Human-readable column label.
    pub label: &'static str,
    /// Which HDB instance serves this station.
    pub db: HdbDatabase,
}

pub static DAVIS_RELEASE: HdbStation =
    HdbStation { sdid: "2166", label: "Davis Release", db: HdbDatabase::LowerColorado };
pub static BELOW_BIG_BEND: HdbStation =
    HdbStation { sdid: "2336", label: "BBBLC", db: HdbDatabase::LowerColorado };
pub static BELOW_NEEDLES_BRIDGE: HdbStation =
    HdbStation { sdid: "7777", label: "BNBLC", db: HdbDatabase::LowerColorado };
pub static RIVER_SECTION_41: HdbStation =
    HdbStation { sdid: "2337", label: "RS41LC", db: HdbDatabase::LowerColorado };
pub static PARKER_RELEASE: HdbStation =
    HdbStation { sdid: "2146", label: "Parker Release", db: HdbDatabase::LowerColorado };
pub static PARKER_GAGE: HdbStation =
    HdbStation { sdid: "2119", label: "PGLC", db: HdbDatabase::LowerColorado };
pub static WATER_WHEEL: HdbStation =
    HdbStation { sdid: "2021", label: "WWLC", db: HdbDatabase::LowerColorado };
pub static BIG_ISLAND: HdbStation =
    HdbStation { sdid: "20179", label: "BIBLC", db: HdbDatabase::LowerColorado };
pub static BLANKENSHIP: HdbStation =
    HdbStation { sdid: "20189", label: "BMPLC", db: HdbDatabase::LowerColorado };
pub static TAYLOR_FERRY: HdbStation =
    HdbStation { sdid: "2020", label: "TFLC", db: HdbDatabase::LowerColorado };
pub static BELOW_OXBOW_BRIDGE: HdbStation =
    HdbStation { sdid: "20184", label: "BOBLC", db: HdbDatabase::LowerColorado };
pub static CIBOLA: HdbStation =
    HdbStation { sdid: "2013", label: "CLC", db: HdbDatabase::LowerColorado };
pub static BELOW_PALO_VERDE: HdbStation =
    HdbStation { sdid: "21877", label: "PPGLC", db: HdbDatabase::YumaAreaOffice };
pub static MARTINEZ_LAKE: HdbStation =
    HdbStation { sdid: "2731", label: "MLLC", db: HdbDatabase::YumaAreaOffice };
pub static POWELL_RELEASE: HdbStation =
    HdbStation { sdid: "1872", label: "Powell Release", db: HdbDatabase::UpperColorado };

/// Every HDB station in the catalog, for registry-wide validation and
/// sdid → label lookups.
pub static HDB_CATALOG: &[&HdbStation] = &[
    &DAVIS_RELEASE,
    &BELOW_BIG_BEND,
    &BELOW_NEEDLES_BRIDGE,
    &RIVER_SECTION_41,
    &PARKER_RELEASE,
    &PARKER_GAGE,
    &WATER_WHEEL,
    &BIG_ISLAND,
    &BLANKENSHIP,
    &TAYLOR_FERRY,
    &BELOW_OXBOW_BRIDGE,
    &CIBOLA,
    &BELOW_PALO_VERDE,
    &MARTINEZ_LAKE,
    &POWELL_RELEASE,
];

// ---------------------------------------------------------------------------
// USGS stations (stream gauge API)
// ---------------------------------------------------------------------------

/// A stream gauge served by the USGS NWIS IV API.
#[derive(Debug, PartialEq, Eq)]
pub struct UsgsStation {
    /// 8-digit USGS site code.
    pub site_code: &'static str,
    /// Fallback label; the fetcher prefers the site name from the response.
    pub label: &'static str,
}

pub static LEES_FERRY: UsgsStation =
    UsgsStation { site_code: "09380000", label: "Colorado River At Lees Ferry (USGS)" };
pub static GRAND_CANYON: UsgsStation =
    UsgsStation { site_code: "09402500", label: "Colorado River Near Grand Canyon (USGS)" };
pub static DIAMOND_CREEK: UsgsStation =
    UsgsStation { site_code: "09404200", label: "Colorado River Above Diamond Creek (USGS)" };
pub static BELOW_PALO_VERDE_USGS: UsgsStation =
    UsgsStation { site_code: "09429100", label: "Colorado River Below Palo Verde Dam (USGS)" };

pub static USGS_CATALOG: &[&UsgsStation] =
    &[&LEES_FERRY, &GRAND_CANYON, &DIAMOND_CREEK, &BELOW_PALO_VERDE_USGS];

// ---------------------------------------------------------------------------
// Station references and reaches
// ---------------------------------------------------------------------------

/// A station in either backend. The fetcher dispatches on this.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StationRef {
    Hdb(&'static HdbStation),
    Usgs(&'static UsgsStation),
}

impl StationRef {
    pub fn label(&self) -> &'static str {
        match self {
            StationRef::Hdb(s) => s.label,
            StationRef::Usgs(s) => s.label,
        }
    }

    /// Backend-native identifier (HDB sdid or USGS site code).
    pub fn id(&self) -> &'static str {
        match self {
            StationRef::Hdb(s) => s.sdid,
            StationRef::Usgs(s) => s.site_code,
        }
    }
}

/// A river segment bounded by an upstream release/gauge and a downstream
/// gauge — the unit of comparison. `max_lag_hours` bounds the travel-time
/// lag a caller may apply for this reach.
#[derive(Debug)]
pub struct Reach {
    /// Stable key used on the command line and in logs.
    pub key: &'static str,
    pub label: &'static str,
    pub upstream: StationRef,
    pub downstream: StationRef,
    pub max_lag_hours: u32,
}

/// All comparable reaches, grouped by stretch and ordered upstream to
/// downstream. One uniform table replaces per-reach conditional wiring:
/// every entry is handled identically by the comparison session.
pub static REACH_REGISTRY: &[Reach] = &[
    // --- Glen Canyon to Hoover stretch ---
    Reach {
        key: "powell-lees-ferry",
        label: "Glen Canyon to Lees Ferry",
        upstream: StationRef::Hdb(&POWELL_RELEASE),
        downstream: StationRef::Usgs(&LEES_FERRY),
        max_lag_hours: 15,
    },
    Reach {
        key: "lees-ferry-grand-canyon",
        label: "Lees Ferry to Grand Canyon",
        upstream: StationRef::Usgs(&LEES_FERRY),
        downstream: StationRef::Usgs(&GRAND_CANYON),
        max_lag_hours: 30,
    },
    Reach {
        key: "grand-canyon-diamond-creek",
        label: "Grand Canyon to Diamond Creek",
        upstream: StationRef::Usgs(&GRAND_CANYON),
        downstream: StationRef::Usgs(&DIAMOND_CREEK),
        max_lag_hours: 30,
    },
    // --- Below Davis stretch ---
    Reach {
        key: "davis-big-bend",
        label: "Davis Dam to Below Big Bend",
        upstream: StationRef::Hdb(&DAVIS_RELEASE),
        downstream: StationRef::Hdb(&BELOW_BIG_BEND),
        max_lag_hours: 15,
    },
    Reach {
        key: "big-bend-needles",
        label: "Below Big Bend to Below Needles Bridge",
        upstream: StationRef::Hdb(&BELOW_BIG_BEND),
        downstream: StationRef::Hdb(&BELOW_NEEDLES_BRIDGE),
        max_lag_hours: 15,
    },
    Reach {
        key: "needles-rs41",
        label: "Below Needles Bridge to River Section 41",
        upstream: StationRef::Hdb(&BELOW_NEEDLES_BRIDGE),
        downstream: StationRef::Hdb(&RIVER_SECTION_41),
        max_lag_hours: 15,
    },
    Reach {
        key: "davis-rs41",
        label: "Davis Dam to River Section 41",
        upstream: StationRef::Hdb(&DAVIS_RELEASE),
        downstream: StationRef::Hdb(&RIVER_SECTION_41),
        max_lag_hours: 15,
    },
    // --- Below Parker stretch ---
    Reach {
        key: "parker-parker-gage",
        label: "Parker Dam to Parker Gage",
        upstream: StationRef::Hdb(&PARKER_RELEASE),
        downstream: StationRef::Hdb(&PARKER_GAGE),
        max_lag_hours: 15,
    },
    Reach {
        key: "parker-gage-water-wheel",
        label: "Parker Gage to Water Wheel",
        upstream: StationRef::Hdb(&PARKER_GAGE),
        downstream: StationRef::Hdb(&WATER_WHEEL),
        max_lag_hours: 15,
    },
    Reach {
        key: "parker-gage-palo-verde",
        label: "Parker Gage to Below Palo Verde Dam",
        upstream: StationRef::Hdb(&PARKER_GAGE),
        downstream: StationRef::Usgs(&BELOW_PALO_VERDE_USGS),
        max_lag_hours: 20,
    },
    Reach {
        key: "palo-verde-taylor-ferry",
        label: "Below Palo Verde Dam to Taylor Ferry",
        upstream: StationRef::Usgs(&BELOW_PALO_VERDE_USGS),
        downstream: StationRef::Hdb(&TAYLOR_FERRY),
        max_lag_hours: 20,
    },
    Reach {
        key: "taylor-ferry-cibola",
        label: "Taylor Ferry to Cibola",
        upstream: StationRef::Hdb(&TAYLOR_FERRY),
        downstream: StationRef::Hdb(&CIBOLA),
        max_lag_hours: 20,
    },
    Reach {
        key: "cibola-martinez-lake",
        label: "Cibola to Martinez Lake",
        upstream: StationRef::Hdb(&CIBOLA),
        downstream: StationRef::Hdb(&MARTINEZ_LAKE),
        max_lag_hours: 20,
    },
    Reach {
        key: "parker-martinez-lake",
        label: "Parker Dam to Martinez Lake",
        upstream: StationRef::Hdb(&PARKER_RELEASE),
        downstream: StationRef::Hdb(&MARTINEZ_LAKE),
        max_lag_hours: 70,
    },
];

/// Looks up a reach by key. Returns `None` if unknown.
pub fn find_reach(key: &str) -> Option<&'static Reach> {
    REACH_REGISTRY.iter().find(|r| r.key == key)
}

pub fn all_reach_keys() -> Vec<&'static str> {
    REACH_REGISTRY.iter().map(|r| r.key).collect()
}

/// Looks up an HDB station by sdid, for labeling response columns.
pub fn find_hdb_station(sdid: &str) -> Option<&'static HdbStation> {
    HDB_CATALOG.iter().copied().find(|s| s.sdid == sdid)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
