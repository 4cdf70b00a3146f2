/// Configuration for a single benchmark scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SceneConfig {
    pub name: &'static str,
    pub width: u32,
    pub height: u32,
    /// Built-in pattern set solved in this scene.
    pub pattern_set: &'static str,
}

impl SceneConfig {
    pub fn cells(&self) -> u32 {
        self.width * self.height
    }
}

/// Return the standard suite of benchmark scenes (16x16 up to 200x200).
pub fn standard_scenes() -> Vec<SceneConfig> {
    [16, 64, 128, 200]
        .into_iter()
        .map(|side| SceneConfig {
            name: square_name(side),
            width: side,
            height: side,
            pattern_set: "terrain",
        })
        .collect()
}

fn square_name(side: u32) -> &'static str {
    match side {
        16 => "terrain-16",
        64 => "terrain-64",
        128 => "terrain-128",
        200 => "terrain-200",
        _ => "terrain",
    }
}
