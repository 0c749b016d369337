//! Diagram configuration and builder
//!
//! This module provides the configuration types for deterministic diagram
//! generation and the tunables consumed by the sweep and by region stitching.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Result, VoronoiError};

/// How region stitching chooses the rectangle corners to insert between two
/// boundary points that lie on different sides of the bounds
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CornerRule {
    /// Walk the rectangle boundary in the direction the cell is being
    /// traversed, inserting every corner passed on the way
    ///
    /// Correct for any convex cell containing its site, including cells that
    /// cover more than half of the rectangle.
    #[default]
    BoundaryWalk,
    /// Insert the corner (or pair of corners) that keeps the detour within
    /// half of the rectangle's perimeter
    ///
    /// Known to pick the wrong way round for regions spanning more than half
    /// of the rectangle, and to insert at most two corners.
    HalfPerimeter,
}

/// Tunables for a single construction
///
/// Both values are inputs to constructors further down the pipeline: the
/// bucket count sizes the beach line and the event queue, the corner rule is
/// handed to region stitching.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DiagramOptions {
    /// Base bucket count `k`; the beach line uses `2k` buckets and the event
    /// queue `4k`. `None` picks `floor(sqrt(n + 4))` for `n` sites.
    pub bucket_count: Option<usize>,

    /// Corner selection used when closing regions along the bounds
    pub corner_rule: CornerRule,
}

impl DiagramOptions {
    /// Base bucket count for `site_count` sites
    pub fn effective_bucket_count(&self, site_count: usize) -> usize {
        self.bucket_count
            .unwrap_or_else(|| ((site_count + 4) as f64).sqrt() as usize)
            .max(1)
    }
}

/// Configuration for deterministic random diagram generation
///
/// The same configuration always produces the identical diagram.
///
/// # Example
///
/// ```rust
/// use rust_fortune_voronoi::*;
///
/// let config = DiagramConfigBuilder::new()
///     .seed(42)
///     .site_count(500)
///     .extents(1024.0, 768.0)
///     .unwrap()
///     .build()
///     .unwrap();
///
/// # #[cfg(feature = "serde")]
/// # {
/// let json = serde_json::to_string(&config).unwrap();
/// let restored: DiagramConfig = serde_json::from_str(&json).unwrap();
/// assert_eq!(config, restored);
/// # }
/// ```
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DiagramConfig {
    /// Random seed for site placement
    pub seed: u64,

    /// Number of sites to place
    pub site_count: usize,

    /// Width of the bounds; sites are placed in `[0, width)`
    pub width: f64,

    /// Height of the bounds; sites are placed in `[0, height)`
    pub height: f64,

    /// Construction tunables
    pub options: DiagramOptions,
}

impl Default for DiagramConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            site_count: DEFAULT_SITE_COUNT,
            width: DEFAULT_EXTENT,
            height: DEFAULT_EXTENT,
            options: DiagramOptions::default(),
        }
    }
}

const DEFAULT_SITE_COUNT: usize = 1_000;
const DEFAULT_EXTENT: f64 = 600.0;

/// Builder for creating a [`DiagramConfig`] with validation
#[derive(Debug, Clone)]
pub struct DiagramConfigBuilder {
    seed: Option<u64>,
    site_count: usize,
    width: f64,
    height: f64,
    options: DiagramOptions,
}

impl DiagramConfigBuilder {
    /// Create a new builder with default values
    ///
    /// Defaults:
    /// - seed: random (from `rand::random`)
    /// - site_count: 1,000
    /// - extents: 600 x 600
    /// - bucket_count: derived from the site count
    /// - corner_rule: [`CornerRule::BoundaryWalk`]
    pub fn new() -> Self {
        Self {
            seed: None,
            site_count: DEFAULT_SITE_COUNT,
            width: DEFAULT_EXTENT,
            height: DEFAULT_EXTENT,
            options: DiagramOptions::default(),
        }
    }

    /// Set the random seed for site placement
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the number of sites
    pub fn site_count(mut self, count: usize) -> Self {
        self.site_count = count;
        self
    }

    /// Set the width and height of the bounds
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if either extent is not a positive finite number
    pub fn extents(mut self, width: f64, height: f64) -> Result<Self> {
        if !(width.is_finite() && width > 0.0) || !(height.is_finite() && height > 0.0) {
            return Err(VoronoiError::InvalidConfig(format!(
                "extents must be positive and finite (got {} x {})",
                width, height
            )));
        }
        self.width = width;
        self.height = height;
        Ok(self)
    }

    /// Override the base bucket count of the sweep structures
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if `count` is zero
    pub fn bucket_count(mut self, count: usize) -> Result<Self> {
        if count == 0 {
            return Err(VoronoiError::InvalidConfig(
                "bucket count must be at least 1".to_string(),
            ));
        }
        self.options.bucket_count = Some(count);
        Ok(self)
    }

    /// Choose how regions are closed along the bounds
    pub fn corner_rule(mut self, rule: CornerRule) -> Self {
        self.options.corner_rule = rule;
        self
    }

    /// Build the configuration
    ///
    /// If no seed was provided, a random one is drawn.
    pub fn build(self) -> Result<DiagramConfig> {
        let seed = self.seed.unwrap_or_else(rand::random);

        Ok(DiagramConfig {
            seed,
            site_count: self.site_count,
            width: self.width,
            height: self.height,
            options: self.options,
        })
    }
}

impl Default for DiagramConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
