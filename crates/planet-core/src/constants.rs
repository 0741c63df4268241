// Shared camera and scene tuning constants used by the web and native frontends.

// Pose limits
pub const POLAR_MIN_DEG: f32 = 5.0; // keep the eye off the +Y pole
pub const POLAR_MAX_DEG: f32 = 175.0; // and off the -Y pole
pub const DEFAULT_MIN_DISTANCE: f32 = 20.0;
pub const DEFAULT_MAX_DISTANCE: f32 = 1000.0;

// Cinematic sessions
pub const DEFAULT_CINEMATIC_DURATION_SEC: f32 = 10.0;
pub const MIN_CINEMATIC_DURATION_SEC: f32 = 0.05;
pub const MAX_CINEMATIC_DURATION_SEC: f32 = 600.0;
pub const DEFAULT_CINEMATIC_ROTATE_DEG: f32 = 360.0; // one full revolution
pub const DEFAULT_DOLLY_NEAR_RATIO: f32 = 0.5; // near = far * ratio when unspecified

// Manual orbit fallback (no orbit-control capability in the host)
pub const AUTO_ROTATE_DEG_PER_SEC_PER_UNIT: f32 = 6.0; // speed 2.0 => one turn per 30 s
pub const MAX_FRAME_DELTA_SEC: f64 = 0.25; // tab switches must not jump the auto-rotate
pub const DRAG_DEG_PER_PX: f32 = 0.25;
pub const ZOOM_STEP: f32 = 0.95; // distance factor per wheel notch

// Scene layout
pub const STAR_FIELD_HALF_EXTENT: f32 = 1000.0;
pub const MAX_STARS: usize = 200_000;
pub const MAX_RING_MEMBERS: usize = 20_000;
pub const REFERENCE_FPS: f32 = 60.0; // speed.* rates are radians per frame at this rate

// Text rings
pub const GLYPH_SPACING_FACTOR: f32 = 0.9; // spacing = factor * glyph size
pub const MAX_RING_GLYPHS: usize = 600;
pub const EMPTY_TEXT_PLACEHOLDER: &str = "\u{2022}";
