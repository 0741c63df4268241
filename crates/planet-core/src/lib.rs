pub mod cinematic;
pub mod constants;
pub mod controller;
pub mod director;
pub mod error;
pub mod motion;
pub mod pose;
pub mod scene;
pub mod settings;
pub mod text_ring;
pub mod textures;

pub use cinematic::*;
pub use constants::*;
pub use controller::*;
pub use director::*;
pub use error::*;
pub use motion::*;
pub use pose::*;
pub use scene::*;
pub use settings::{resolve, SceneSettings, SettingsPatch, SettingsStore};
pub use text_ring::*;
pub use textures::*;
