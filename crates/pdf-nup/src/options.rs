use crate::constants::MAX_N_UP;
use crate::layout::{SheetGeometry, grid_shape};
use crate::types::*;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Number of logical pages per physical sheet, always in `1..=8`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(try_from = "u8", into = "u8")
)]
pub struct NUp(u8);

impl NUp {
    pub const ONE: NUp = NUp(1);
    pub const FOUR: NUp = NUp(4);

    pub fn new(n: u8) -> Result<Self> {
        if (1..=MAX_N_UP).contains(&n) {
            Ok(Self(n))
        } else {
            Err(NupError::Config(format!(
                "Pages per sheet must be between 1 and {}, got {}",
                MAX_N_UP, n
            )))
        }
    }

    pub fn get(self) -> usize {
        self.0 as usize
    }
}

impl Default for NUp {
    fn default() -> Self {
        NUp::ONE
    }
}

impl TryFrom<u8> for NUp {
    type Error = NupError;

    fn try_from(n: u8) -> Result<Self> {
        NUp::new(n)
    }
}

impl From<NUp> for u8 {
    fn from(n: NUp) -> u8 {
        n.0
    }
}

/// Sheet layout configuration
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LayoutSettings {
    pub n_up: NUp,
    /// Outline every occupied cell
    pub show_borders: bool,
    /// Print the sheet number in the bottom margin
    #[cfg_attr(feature = "serde", serde(default))]
    pub show_page_numbers: bool,
}

impl LayoutSettings {
    pub fn new(n_up: NUp, show_borders: bool) -> Self {
        Self {
            n_up,
            show_borders,
            show_page_numbers: false,
        }
    }

    /// Load settings from a JSON file
    #[cfg(feature = "serde")]
    pub async fn load(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let settings: LayoutSettings = serde_json::from_slice(&bytes)
            .map_err(|e| NupError::Config(format!("Failed to parse layout: {}", e)))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Save settings to a JSON file
    #[cfg(feature = "serde")]
    pub async fn save(&self, path: impl AsRef<std::path::Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| NupError::Config(format!("Failed to serialize layout: {}", e)))?;
        tokio::fs::write(path, json).await?;
        Ok(())
    }

    /// Check the settings against the default A4 sheet
    pub fn validate(&self) -> Result<()> {
        self.validate_for(&SheetGeometry::a4())
    }

    /// Check that every cell of this grid on `geometry` leaves room for an
    /// image once the inner pad is taken off.
    ///
    /// The N-up range itself is enforced by [`NUp`].
    pub fn validate_for(&self, geometry: &SheetGeometry) -> Result<()> {
        let dims = [geometry.width, geometry.height];
        if dims.iter().any(|d| !d.is_finite() || *d <= 0.0) {
            return Err(NupError::Config(format!(
                "Sheet size must be positive, got {}x{}",
                geometry.width, geometry.height
            )));
        }
        let spacing = [geometry.margin, geometry.inner_pad];
        if spacing.iter().any(|d| !d.is_finite() || *d < 0.0) {
            return Err(NupError::Config(format!(
                "Margin and inner pad must be non-negative, got {} and {}",
                geometry.margin, geometry.inner_pad
            )));
        }

        let shape = grid_shape(self.n_up);
        let cell_width = geometry.cell_width(shape);
        let cell_height = geometry.cell_height(shape);
        if cell_width <= geometry.inner_pad || cell_height <= geometry.inner_pad {
            return Err(NupError::Config(format!(
                "{}-up cells of {:.1}x{:.1} pt leave no room inside a {} pt pad",
                self.n_up.get(),
                cell_width,
                cell_height,
                geometry.inner_pad
            )));
        }
        Ok(())
    }
}

/// One-click layouts for common study and print jobs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Preset {
    /// One page per sheet, no borders; page edits are kept
    Standard,
    /// Four slides per sheet, rotated to fill portrait cells
    SmartGrid,
    /// Smart grid plus inverted, high-contrast grayscale
    InkSaver,
}

impl Preset {
    /// Layout this preset switches to
    pub fn layout(self) -> LayoutSettings {
        match self {
            Preset::Standard => LayoutSettings::new(NUp::ONE, false),
            Preset::SmartGrid | Preset::InkSaver => LayoutSettings::new(NUp::FOUR, true),
        }
    }

    /// Apply the preset's page edits to a descriptor
    pub fn apply_to_page(self, page: &mut PageDescriptor) {
        match self {
            Preset::Standard => {}
            Preset::SmartGrid => {
                page.rotation = Rotation::Clockwise90;
            }
            Preset::InkSaver => {
                page.rotation = Rotation::Clockwise90;
                page.filters = FilterParams::new(true, true, 10.0, 50.0);
            }
        }
    }
}
