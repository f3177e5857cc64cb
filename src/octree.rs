//! Two-pass octree color quantization.
//!
//! The build pass inserts every opaque pixel into an octree whose depth is
//! `max_color_bits`. Building the palette folds the deepest nodes into their
//! parents until at most `max_colors` leaves remain; each leaf becomes one
//! palette entry holding the average of the pixels it absorbed.

use alloc::vec;
use alloc::vec::Vec;

use crate::error::QuantizeError;
use crate::palette::Palette;
use crate::pixel::Color32;
use crate::strategy::{PassMode, QuantizeStrategy};

type NodeId = u32;

const ROOT: NodeId = 0;

#[derive(Debug, Default)]
struct Node {
    leaf: bool,
    pixel_count: u64,
    red: u64,
    green: u64,
    blue: u64,
    children: [Option<NodeId>; 8],
    palette_index: u8,
}

impl Node {
    fn add(&mut self, pixel: Color32) {
        self.pixel_count += 1;
        self.red += pixel.r as u64;
        self.green += pixel.g as u64;
        self.blue += pixel.b as u64;
    }

    fn average(&self) -> Color32 {
        let n = self.pixel_count.max(1);
        Color32::opaque(
            (self.red / n) as u8,
            (self.green / n) as u8,
            (self.blue / n) as u8,
        )
    }
}

/// Child slot at `level`: bit `7 - level` of red, green, blue (red highest).
#[inline]
fn child_slot(pixel: Color32, level: u32) -> usize {
    let shift = 7 - level;
    let r = (pixel.r >> shift) & 1;
    let g = (pixel.g >> shift) & 1;
    let b = (pixel.b >> shift) & 1;
    ((r << 2) | (g << 1) | b) as usize
}

/// Octree quantizer producing up to `max_colors` colors plus a transparent entry.
#[derive(Debug)]
pub struct OctreeStrategy {
    max_colors: u32,
    max_color_bits: u32,
    /// Arena; node 0 is the root. Folded children stay allocated but unreachable.
    nodes: Vec<Node>,
    /// Interior nodes per level, most recently created last.
    reducible: Vec<Vec<NodeId>>,
    leaf_count: usize,
    previous_color: Option<u32>,
    previous_leaf: Option<NodeId>,
}

impl OctreeStrategy {
    /// `max_colors` in 1..=255 (one more slot is taken by the transparent
    /// entry), `max_color_bits` in 1..=8 (tree depth, bits kept per channel).
    pub fn new(max_colors: u32, max_color_bits: u32) -> Result<Self, QuantizeError> {
        if !(1..=255).contains(&max_colors) {
            return Err(QuantizeError::InvalidMaxColors(max_colors));
        }
        if !(1..=8).contains(&max_color_bits) {
            return Err(QuantizeError::InvalidColorBits(max_color_bits));
        }
        let mut reducible = vec![Vec::new(); max_color_bits as usize];
        reducible[0].push(ROOT);
        Ok(Self {
            max_colors,
            max_color_bits,
            nodes: vec![Node::default()],
            reducible,
            leaf_count: 0,
            previous_color: None,
            previous_leaf: None,
        })
    }

    pub fn max_colors(&self) -> u32 {
        self.max_colors
    }

    pub fn max_color_bits(&self) -> u32 {
        self.max_color_bits
    }

    /// Palette index reserved for fully transparent pixels.
    pub fn transparent_index(&self) -> u8 {
        self.max_colors as u8
    }

    /// Current number of leaves (distinct color cells).
    pub fn leaf_count(&self) -> usize {
        self.leaf_count
    }

    fn alloc_node(&mut self, level: u32) -> NodeId {
        let id = self.nodes.len() as NodeId;
        let leaf = level == self.max_color_bits;
        self.nodes.push(Node {
            leaf,
            ..Node::default()
        });
        if leaf {
            self.leaf_count += 1;
        } else {
            self.reducible[level as usize].push(id);
        }
        id
    }

    fn add_color(&mut self, pixel: Color32) {
        if self.previous_color == Some(pixel.argb()) {
            if let Some(leaf) = self.previous_leaf {
                self.nodes[leaf as usize].add(pixel);
                return;
            }
        }

        let mut id = ROOT;
        let mut level = 0;
        while !self.nodes[id as usize].leaf {
            let slot = child_slot(pixel, level);
            id = match self.nodes[id as usize].children[slot] {
                Some(child) => child,
                None => {
                    let child = self.alloc_node(level + 1);
                    self.nodes[id as usize].children[slot] = Some(child);
                    child
                }
            };
            level += 1;
        }

        self.nodes[id as usize].add(pixel);
        self.previous_color = Some(pixel.argb());
        self.previous_leaf = Some(id);
    }

    /// Fold the most recently created interior node of the deepest populated
    /// level into a single leaf. Returns false once nothing is left to fold.
    fn reduce(&mut self) -> bool {
        let mut level = self.reducible.len() - 1;
        while level > 0 && self.reducible[level].is_empty() {
            level -= 1;
        }
        let Some(id) = self.reducible[level].pop() else {
            return false;
        };

        let children = core::mem::take(&mut self.nodes[id as usize].children);
        let mut folded = Node::default();
        let mut removed = 0usize;
        for child in children.iter().flatten() {
            let c = &self.nodes[*child as usize];
            folded.red += c.red;
            folded.green += c.green;
            folded.blue += c.blue;
            folded.pixel_count += c.pixel_count;
            removed += 1;
        }

        let node = &mut self.nodes[id as usize];
        node.red += folded.red;
        node.green += folded.green;
        node.blue += folded.blue;
        node.pixel_count += folded.pixel_count;
        node.leaf = true;

        // Children of a reducible node at the deepest level are leaves.
        self.leaf_count = self.leaf_count + 1 - removed;
        self.previous_color = None;
        self.previous_leaf = None;
        log::trace!("octree: folded node {id} at level {level}, {} leaves", self.leaf_count);
        true
    }

    /// Assign palette indices to leaves in tree order and collect their colors.
    fn collect_leaves(&mut self, entries: &mut Vec<Color32>) {
        let mut stack = vec![ROOT];
        while let Some(id) = stack.pop() {
            let node = &mut self.nodes[id as usize];
            if node.leaf {
                node.palette_index = entries.len() as u8;
                entries.push(node.average());
                continue;
            }
            // Reversed so slot 0 is visited first.
            stack.extend(node.children.iter().rev().flatten());
        }
    }
}

impl QuantizeStrategy for OctreeStrategy {
    fn pass_mode(&self) -> PassMode {
        PassMode::TwoPass
    }

    fn observe(&mut self, pixel: Color32) {
        if pixel.a > 0 {
            self.add_color(pixel);
        }
    }

    fn build_palette(&mut self, previous: Palette) -> Palette {
        while self.leaf_count > self.max_colors as usize && self.reduce() {}

        let max = self.max_colors as usize;
        let previous = previous.into_entries();
        let mut entries = Vec::with_capacity(max + 1);
        self.collect_leaves(&mut entries);
        log::debug!(
            "octree: {} leaf colors for {} slots ({} bits)",
            entries.len(),
            max,
            self.max_color_bits
        );

        // Unused slots keep whatever the replaced palette had there.
        while entries.len() < max {
            let fill = previous.get(entries.len()).copied().unwrap_or(Color32::BLACK);
            entries.push(fill);
        }
        entries.push(Color32::TRANSPARENT);

        Palette::with_transparent(entries, self.transparent_index())
    }

    fn map(&self, pixel: Color32) -> u8 {
        if pixel.a == 0 {
            return self.transparent_index();
        }

        let mut node = &self.nodes[ROOT as usize];
        let mut level = 0;
        while !node.leaf {
            let slot = child_slot(pixel, level);
            // Colors never observed take the first existing branch.
            let next = node.children[slot].or_else(|| node.children.iter().flatten().next().copied());
            match next {
                Some(child) => node = &self.nodes[child as usize],
                // Empty tree: nothing was observed.
                None => return 0,
            }
            level += 1;
        }
        node.palette_index
    }
}
