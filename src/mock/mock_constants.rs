// Motion of the simulated axis in degree per pass for 1% of effort.
pub const PLANT_DEGREE_PER_PERCENT: f64 = 0.05;

// Raw infrared levels of the simulated scene.
pub const PLANT_BACKGROUND_LEVEL: f64 = 20.0;
pub const PLANT_TARGET_LEVEL: f64 = 80.0;

// Default location of the hot target in the thermal image.
pub const PLANT_TARGET_ROW: usize = 10;
pub const PLANT_TARGET_COLUMN: usize = 18;
