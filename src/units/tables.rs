use super::UnitTier;

pub(super) struct UnitFamily {
    pub(super) name: &'static str,
    pub(super) tiers: &'static [UnitTier],
}

const HOUR: f64 = 3600.0;
const DAY: f64 = 86_400.0;

/// Absolute quantities, tiers ordered finest to coarsest.
pub(super) const SCALE_FAMILIES: &[UnitFamily] = &[
    UnitFamily {
        name: "time",
        tiers: &[
            UnitTier { label: "seconds", divisor: 1.0, threshold: 24.0 },
            UnitTier { label: "hours", divisor: HOUR, threshold: 24.0 },
            UnitTier { label: "days", divisor: DAY, threshold: 15.0 },
            UnitTier { label: "weeks", divisor: DAY * 7.0, threshold: 10.0 },
            UnitTier { label: "months", divisor: DAY * 30.0, threshold: 12.0 },
            UnitTier { label: "years", divisor: DAY * 365.0, threshold: 1.0 },
        ],
    },
    UnitFamily {
        name: "cpupower",
        tiers: &[
            UnitTier { label: "HS06 hours", divisor: HOUR, threshold: 24.0 },
            UnitTier { label: "HS06 days", divisor: DAY, threshold: 750.0 },
            UnitTier { label: "kHS06 days", divisor: DAY * 1e3, threshold: 750.0 },
            UnitTier { label: "MHS06 days", divisor: DAY * 1e6, threshold: 1.0 },
        ],
    },
    UnitFamily {
        name: "bytes",
        tiers: &[
            UnitTier { label: "MB", divisor: 1e6, threshold: 1000.0 },
            UnitTier { label: "GB", divisor: 1e9, threshold: 1000.0 },
            UnitTier { label: "TB", divisor: 1e12, threshold: 1000.0 },
            UnitTier { label: "PB", divisor: 1e15, threshold: 1.0 },
        ],
    },
    UnitFamily {
        name: "jobs",
        tiers: &[
            UnitTier { label: "jobs", divisor: 1.0, threshold: 1000.0 },
            UnitTier { label: "kjobs", divisor: 1e3, threshold: 1000.0 },
            UnitTier { label: "Mjobs", divisor: 1e6, threshold: 1.0 },
        ],
    },
    UnitFamily {
        name: "files",
        tiers: &[
            UnitTier { label: "files", divisor: 1.0, threshold: 1000.0 },
            UnitTier { label: "kfiles", divisor: 1e3, threshold: 1000.0 },
            UnitTier { label: "Mfiles", divisor: 1e6, threshold: 1.0 },
        ],
    },
];

/// Per-second rate quantities, tiers ordered finest to coarsest.
pub(super) const RATE_FAMILIES: &[UnitFamily] = &[
    UnitFamily {
        name: "time",
        tiers: &[
            UnitTier { label: "seconds / s", divisor: 1.0, threshold: 24.0 },
            UnitTier { label: "hours / s", divisor: HOUR, threshold: 24.0 },
            UnitTier { label: "days / s", divisor: DAY, threshold: 15.0 },
            UnitTier { label: "weeks / s", divisor: DAY * 7.0, threshold: 10.0 },
            UnitTier { label: "months / s", divisor: DAY * 30.0, threshold: 12.0 },
            UnitTier { label: "years / s", divisor: DAY * 365.0, threshold: 1.0 },
        ],
    },
    UnitFamily {
        name: "cpupower",
        tiers: &[
            UnitTier { label: "HS06", divisor: 1.0, threshold: 750.0 },
            UnitTier { label: "kHS06", divisor: 1e3, threshold: 750.0 },
            UnitTier { label: "MHS06", divisor: 1e6, threshold: 1.0 },
        ],
    },
    UnitFamily {
        name: "bytes",
        tiers: &[
            UnitTier { label: "MB / s", divisor: 1e6, threshold: 1000.0 },
            UnitTier { label: "GB / s", divisor: 1e9, threshold: 1000.0 },
            UnitTier { label: "TB / s", divisor: 1e12, threshold: 1000.0 },
            UnitTier { label: "PB / s", divisor: 1e15, threshold: 1.0 },
        ],
    },
    UnitFamily {
        name: "jobs",
        tiers: &[
            UnitTier { label: "jobs / hour", divisor: 1.0 / HOUR, threshold: 1000.0 },
            UnitTier { label: "kjobs / hour", divisor: 1e3 / HOUR, threshold: 1000.0 },
            UnitTier { label: "Mjobs / hour", divisor: 1e6 / HOUR, threshold: 1.0 },
        ],
    },
    UnitFamily {
        name: "files",
        tiers: &[
            UnitTier { label: "files / hour", divisor: 1.0 / HOUR, threshold: 1000.0 },
            UnitTier { label: "kfiles / hour", divisor: 1e3 / HOUR, threshold: 1000.0 },
            UnitTier { label: "Mfiles / hour", divisor: 1e6 / HOUR, threshold: 1.0 },
        ],
    },
];
