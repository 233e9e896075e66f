use nalgebra::{Point2, Point3};

use super::effects::SpriteKind;
use crate::model::BodyID;

/// Everything the rendering surface needs for one frame, in pixels, in
/// back-to-front order within each list.
#[derive(Debug, Clone)]
pub struct RenderCommands {
    pub background: Point3<f32>,
    pub label_color: Point3<f32>,
    pub bodies: Vec<BodyCommand>,
    pub flashes: Vec<FlashCommand>,
    pub bursts: Vec<BurstCommand>,
    pub sprites: Vec<SpriteCommand>,
}

#[derive(Debug, Clone)]
pub struct BodyCommand {
    pub id: BodyID,
    pub position: Point2<f64>,
    pub size: f64,
    pub rotation: f64,
    pub color: Point3<f32>,
    pub glow: f64,
    pub label_visible: bool,
    pub label: String,
    pub icon: Option<String>,
}

#[derive(Debug, Clone)]
pub struct FlashCommand {
    pub position: Point2<f64>,
    pub radius: f64,
    pub inner_color: Point3<f32>,
    pub outer_color: Point3<f32>,
    pub alpha: f32,
}

#[derive(Debug, Clone)]
pub struct BurstCommand {
    pub position: Point2<f64>,
    pub radius: f64,
    pub color: Point3<f32>,
    pub alpha: f32,
}

#[derive(Debug, Clone)]
pub struct SpriteCommand {
    pub kind: SpriteKind,
    pub position: Point2<f64>,
    pub rotation: f64,
    pub color: Point3<f32>,
    pub alpha: f32,
}
