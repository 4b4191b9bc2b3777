//! The four view presets: slider, spring, housing and the combined assembly.
//!
//! A preset is pure data: where the camera starts, how fast the part spins,
//! which light is on, which assets go into which slot with which material,
//! and the timeline that schedules the loads. All parameters are literal
//! constants; there is no configuration file.

use cgmath::Vector3;

use crate::{
    context::LightUniform,
    material::MaterialParams,
    timeline::{Action, Step},
};

/// Gold, as 0xffd700.
const GOLD: [f32; 3] = [1.0, 0.843, 0.0];
/// Housing grey, as #8c8c8c.
const HOUSING_GREY: [f32; 3] = [0.549, 0.549, 0.549];
const BLACK: [f32; 3] = [0.0, 0.0, 0.0];

/// The HDR panorama every preset lights with.
pub const ENVIRONMENT_HDR: &str = "brown_photostudio_02_1k.hdr";

/// One asset to load into the scene: file, material, placement.
#[derive(Clone, Debug)]
pub struct AssetSlot {
    pub path: &'static str,
    pub material: MaterialParams,
    pub position: Vector3<f32>,
}

impl AssetSlot {
    fn at_origin(path: &'static str, material: MaterialParams) -> Self {
        Self {
            path,
            material,
            position: Vector3::new(0.0, 0.0, 0.0),
        }
    }
}

/// Everything that distinguishes one mounted view from another.
#[derive(Clone, Debug)]
pub struct ViewPreset {
    pub name: &'static str,
    pub camera_position: [f32; 3],
    pub auto_rotate_speed: f32,
    pub light: LightUniform,
    pub environment: &'static str,
    pub slots: Vec<AssetSlot>,
    pub steps: Vec<Step>,
}

impl ViewPreset {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "slider" => Some(Self::slider()),
            "spring" => Some(Self::spring()),
            "housing" => Some(Self::housing()),
            "combined" => Some(Self::combined()),
            _ => None,
        }
    }

    pub fn slider() -> Self {
        Self {
            name: "slider",
            camera_position: [0.0, 0.0, 100.0],
            auto_rotate_speed: 1.0,
            light: LightUniform::point([200.0, 200.0, 200.0]),
            environment: ENVIRONMENT_HDR,
            slots: vec![AssetSlot::at_origin(
                "slider.glb",
                MaterialParams::clearcoat(GOLD),
            )],
            steps: vec![Step::new(0, Action::LoadAsset(0))],
        }
    }

    pub fn spring() -> Self {
        Self {
            name: "spring",
            camera_position: [0.0, 0.0, 100.0],
            auto_rotate_speed: 1.0,
            light: LightUniform::point([200.0, 200.0, 200.0]),
            environment: ENVIRONMENT_HDR,
            slots: vec![AssetSlot::at_origin(
                "spring.glb",
                MaterialParams::clearcoat(BLACK).with_double_side(),
            )],
            steps: vec![Step::new(0, Action::LoadAsset(0))],
        }
    }

    pub fn housing() -> Self {
        Self {
            name: "housing",
            camera_position: [0.0, 0.0, 100.0],
            auto_rotate_speed: 1.5,
            light: LightUniform::point([200.0, 200.0, 200.0]),
            environment: ENVIRONMENT_HDR,
            slots: vec![AssetSlot::at_origin(
                "bock.glb",
                MaterialParams::clearcoat(HOUSING_GREY).with_double_side(),
            )],
            steps: vec![Step::new(0, Action::LoadAsset(0))],
        }
    }

    /// All three parts in one scene, loaded at staggered offsets, with the
    /// rotation flourish while the housing arrives. The speed steps are
    /// wall-clock based (keyed to the load requests, not their completions).
    pub fn combined() -> Self {
        Self {
            name: "combined",
            camera_position: [100.0, 100.0, 0.0],
            // The combined view is lit by the environment alone.
            auto_rotate_speed: 10.0,
            light: LightUniform::off(),
            environment: ENVIRONMENT_HDR,
            slots: vec![
                AssetSlot::at_origin("slider.glb", MaterialParams::clearcoat(GOLD)),
                AssetSlot::at_origin(
                    "spring.glb",
                    MaterialParams::clearcoat(BLACK).with_double_side(),
                ),
                AssetSlot::at_origin(
                    "bock.glb",
                    MaterialParams::clearcoat(HOUSING_GREY).with_double_side(),
                ),
            ],
            steps: vec![
                Step::new(0, Action::SetAutoRotateSpeed(10.0)),
                Step::new(0, Action::LoadAsset(0)),
                Step::new(1000, Action::LoadAsset(1)),
                Step::new(2000, Action::LoadAsset(2)),
                Step::new(2000, Action::SetAutoRotateSpeed(50.0)),
                Step::new(2800, Action::SetAutoRotateSpeed(1.5)),
            ],
        }
    }
}
