use nalgebra::Point3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

/// Colors that depend on the theme. Body colors never do.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette {
    pub background: Point3<f32>,
    pub label: Point3<f32>,
    pub burst: Point3<f32>,
    pub sprite: Point3<f32>,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }

    pub fn palette(self) -> Palette {
        match self {
            Theme::Dark => Palette {
                background: Point3::new(0.02, 0.02, 0.06),
                label: Point3::new(0.95, 0.95, 1.0),
                burst: Point3::new(1.0, 0.85, 0.55),
                sprite: Point3::new(0.75, 0.8, 0.9),
            },
            Theme::Light => Palette {
                background: Point3::new(0.96, 0.96, 0.93),
                label: Point3::new(0.1, 0.1, 0.15),
                burst: Point3::new(0.95, 0.45, 0.2),
                sprite: Point3::new(0.3, 0.35, 0.45),
            },
        }
    }
}
