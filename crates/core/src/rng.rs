//! RNG module - seeded token generation
//!
//! Implements a "color bag": each bag holds every palette color once, shuffled, and
//! tokens draw from the bag until it is empty, then a new bag is shuffled. This keeps
//! color distribution fair over short stretches while staying fully deterministic.
//!
//! Also provides a simple LCG used for obstacle placement and reshuffles.

use arrayvec::ArrayVec;

use crate::types::{Color, Position, Token, TokenId, PALETTE_MAX};

/// Simple LCG (Linear Congruential Generator) RNG
/// Uses constants from Numerical Recipes
#[derive(Debug, Clone)]
pub struct SimpleRng {
    state: u32,
}

impl SimpleRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u32) -> Self {
        // Avoid 0 seed which would produce all zeros
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Generate next random u32
    pub fn next_u32(&mut self) -> u32 {
        // LCG formula: (a * state + c) mod m
        // Using Numerical Recipes constants: a=1664525, c=1013904223, m=2^32
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }

    /// Generate random value in range [0, max)
    pub fn next_range(&mut self, max: u32) -> u32 {
        // Low bits of an LCG cycle with a short period; use the high ones.
        (self.next_u32() >> 8) % max.max(1)
    }

    /// Shuffle a slice using Fisher-Yates
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        for i in (1..slice.len()).rev() {
            let j = self.next_range((i + 1) as u32) as usize;
            slice.swap(i, j);
        }
    }

    pub fn state(&self) -> u32 {
        self.state
    }
}

/// Color-bag token generator
#[derive(Debug, Clone)]
pub struct TokenSource {
    palette: u8,
    /// Current bag of colors
    bag: ArrayVec<Color, { PALETTE_MAX as usize }>,
    /// Index into current bag
    bag_index: usize,
    rng: SimpleRng,
    next_id: u32,
}

impl TokenSource {
    /// Create a new source with the given seed, drawing from the first `palette` colors
    pub fn new(seed: u32, palette: u8) -> Self {
        let mut source = Self {
            palette: palette.clamp(1, PALETTE_MAX),
            bag: ArrayVec::new(),
            bag_index: 0,
            rng: SimpleRng::new(seed),
            next_id: 1,
        };
        source.refill_bag();
        source
    }

    /// Generate a new shuffled bag
    fn refill_bag(&mut self) {
        self.bag.clear();
        self.bag
            .extend(Color::palette(self.palette).iter().copied());
        self.rng.shuffle(&mut self.bag);
        self.bag_index = 0;
    }

    pub fn palette(&self) -> u8 {
        self.palette
    }

    /// Draw the next color from the bag
    pub fn draw_color(&mut self) -> Color {
        if self.bag_index >= self.bag.len() {
            self.refill_bag();
        }
        let color = self.bag[self.bag_index];
        self.bag_index += 1;
        color
    }

    /// Draw a color that is not in `excluded`.
    ///
    /// Bounded: after two full bags without an acceptable draw, falls back to the first
    /// allowed palette color (or any color if everything is excluded).
    pub fn draw_color_excluding(&mut self, excluded: &[Color]) -> Color {
        for _ in 0..(self.palette as usize * 2) {
            let color = self.draw_color();
            if !excluded.contains(&color) {
                return color;
            }
        }
        Color::palette(self.palette)
            .iter()
            .copied()
            .find(|c| !excluded.contains(c))
            .unwrap_or_else(|| self.draw_color())
    }

    /// Allocate the next token id
    pub fn next_id(&mut self) -> TokenId {
        let id = TokenId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        id
    }

    /// Make sure future ids are above `max_used`
    pub fn reserve_ids(&mut self, max_used: u32) {
        if self.next_id <= max_used {
            self.next_id = max_used.wrapping_add(1);
        }
    }

    /// Spawn a fresh plain token
    pub fn spawn(&mut self, pos: Position) -> Token {
        let color = self.draw_color();
        Token::plain(self.next_id(), color, pos)
    }

    /// Spawn a fresh plain token avoiding some colors
    pub fn spawn_excluding(&mut self, pos: Position, excluded: &[Color]) -> Token {
        let color = self.draw_color_excluding(excluded);
        Token::plain(self.next_id(), color, pos)
    }

    pub fn rng_mut(&mut self) -> &mut SimpleRng {
        &mut self.rng
    }

    /// Current RNG state (for replaying a session from the same point)
    pub fn seed(&self) -> u32 {
        self.rng.state()
    }
}

impl Default for TokenSource {
    fn default() -> Self {
        Self::new(1, crate::types::DEFAULT_PALETTE)
    }
}
