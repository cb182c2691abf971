use crate::config::ZoomConfig;

/// Diagram zoom with a fine step below 100% and a coarse step above it.
#[derive(Debug, Clone, PartialEq)]
pub struct ZoomController {
    zoom: f64,
    config: ZoomConfig,
}

impl ZoomController {
    pub fn new(mut config: ZoomConfig) -> Self {
        if config.min > config.max {
            std::mem::swap(&mut config.min, &mut config.max);
        }
        let zoom = 1.0_f64.clamp(config.min, config.max);
        Self { zoom, config }
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    pub fn zoom_in(&mut self) -> f64 {
        let step = self.step();
        self.set(self.zoom + step)
    }

    pub fn zoom_out(&mut self) -> f64 {
        let step = self.step();
        self.set(self.zoom - step)
    }

    pub fn reset(&mut self) -> f64 {
        self.set(1.0)
    }

    fn step(&self) -> f64 {
        if self.zoom < 1.0 {
            self.config.fine_step
        } else {
            self.config.coarse_step
        }
    }

    fn set(&mut self, value: f64) -> f64 {
        // Round to hundredths so repeated steps do not drift off the 0.05 grid.
        let rounded = (value * 100.0).round() / 100.0;
        self.zoom = rounded.clamp(self.config.min, self.config.max);
        self.zoom
    }
}

impl Default for ZoomController {
    fn default() -> Self {
        Self::new(ZoomConfig::default())
    }
}
