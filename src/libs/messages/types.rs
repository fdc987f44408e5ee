#[derive(Debug, Clone)]
pub enum Message {
    // === VEHICLE MESSAGES ===
    VehicleCreated(String, i64), // name, id
    VehicleUpdated(String),
    VehicleDeleted(String),
    VehicleNotFound(i64),
    VehicleHasEntries(String, i64), // name, entry count
    VehicleCalibrated(String, String), // name, date
    VehiclesHeader,
    VehicleHeader(String),
    NoVehiclesFound,
    ConfirmDeleteVehicle(String),

    // === FUEL ENTRY MESSAGES ===
    FuelEntryCreated(i64),
    FuelEntryUpdated(i64),
    FuelEntryDeleted(i64),
    FuelEntryNotFound(i64),
    FuelEntriesHeader(String), // vehicle name or "all vehicles"
    LatestFuelEntryHeader(String),
    NoFuelEntriesFound,
    ConfirmDeleteFuelEntry(i64),
    CalibrationRecordedWithEntry(String), // vehicle name

    // === STATISTICS MESSAGES ===
    StatsHeader(String),
    EconomyHeader,
    CostsHeader,
    InsufficientHistory(usize), // entries available
    SkippedSegments(usize),
    ManualEconomyFallback,
    FuelComparison {
        best: String,
        price_ratio: f64,
        economy_ratio: f64,
    },
    FuelComparisonUnavailable,

    // === REMINDER MESSAGES ===
    RemindersHeader,
    CalibrationReminder(String, String), // vehicle name, status
    NoRemindersEnabled,

    // === CONFIGURATION MESSAGES ===
    ConfigSaved,
    ConfigDeleted,
    ConfigModuleStorage,
    ConfigModuleReminders,

    // === DATABASE MESSAGES ===
    DatabaseLocation(String),
    DatabaseStatus(String),
    DatabaseReconnected,
    DatabaseReset,
    ConfirmResetDatabase,
    DatabaseVersion { current: u32, latest: u32 },
    DatabaseUpToDate,
    DatabaseNeedsUpdate,
    MigrationHistory,
    MigrationsApplied(usize),
    MigrationSkipped(String), // error

    // === PROMPTS ===
    PromptSelectModules,
    PromptDbFile,
    PromptWal,
    PromptDefaultFrequency,

    // === GENERAL MESSAGES ===
    OperationCancelled,
    InvalidDate(String),
    NothingToUpdate,
}
