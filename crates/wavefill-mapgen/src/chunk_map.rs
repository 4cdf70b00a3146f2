use std::collections::HashMap;

use glam::IVec2;
use wavefill_core::grid::Grid;
use wavefill_core::types::ChunkCoord;

use crate::chunk::{Chunk, ChunkState};

/// Generated chunks keyed by coordinate.
pub struct ChunkMap<P> {
    chunks: HashMap<ChunkCoord, Chunk<P>>,
    chunk_size: u32,
}

impl<P: Clone> ChunkMap<P> {
    pub fn new(chunk_size: u32) -> Self {
        Self {
            chunks: HashMap::new(),
            chunk_size,
        }
    }

    pub fn chunk_size(&self) -> u32 {
        self.chunk_size
    }

    /// Store a chunk, replacing any previous chunk at the same coordinate.
    pub fn insert(&mut self, chunk: Chunk<P>) -> Option<Chunk<P>> {
        self.chunks.insert(chunk.coord, chunk)
    }

    pub fn extend(&mut self, chunks: impl IntoIterator<Item = Chunk<P>>) {
        for chunk in chunks {
            self.insert(chunk);
        }
    }

    pub fn get(&self, coord: &ChunkCoord) -> Option<&Chunk<P>> {
        self.chunks.get(coord)
    }

    pub fn remove(&mut self, coord: &ChunkCoord) -> Option<Chunk<P>> {
        self.chunks.remove(coord)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ChunkCoord, &Chunk<P>)> {
        self.chunks.iter()
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Counts for reporting: (generated, fell back, failed).
    pub fn chunk_counts(&self) -> (u32, u32, u32) {
        let mut generated = 0;
        let mut fell_back = 0;
        let mut failed = 0;
        for chunk in self.chunks.values() {
            match chunk.state() {
                ChunkState::Generated => generated += 1,
                ChunkState::FellBack => fell_back += 1,
                ChunkState::Failed => failed += 1,
            }
        }
        (generated, fell_back, failed)
    }

    /// Coordinates of failed chunks, sorted row-major.
    pub fn failed(&self) -> Vec<ChunkCoord> {
        let mut out: Vec<_> = self
            .chunks
            .values()
            .filter(|c| c.state() == ChunkState::Failed)
            .map(|c| c.coord)
            .collect();
        out.sort_by_key(|c| (c.y, c.x));
        out
    }

    /// Stitch the `chunks_x x chunks_y` block of chunks starting at `origin`
    /// into one grid. `None` if any chunk in the block is missing or failed.
    pub fn assemble(&self, origin: ChunkCoord, chunks_x: u32, chunks_y: u32) -> Option<Grid<P>> {
        let size = self.chunk_size as usize;
        let width = chunks_x as usize * size;
        let height = chunks_y as usize * size;

        let mut rows: Vec<Vec<Option<P>>> = vec![vec![None; width]; height];
        for cy in 0..chunks_y {
            for cx in 0..chunks_x {
                let coord = origin + IVec2::new(cx as i32, cy as i32);
                let grid = self.chunks.get(&coord)?.grid()?;
                if grid.width() != self.chunk_size || grid.height() != self.chunk_size {
                    return None;
                }
                for (i, row) in grid.rows().enumerate() {
                    let y = cy as usize * size + i;
                    let x0 = cx as usize * size;
                    for (dx, cell) in row.iter().enumerate() {
                        rows[y][x0 + dx] = Some(cell.clone());
                    }
                }
            }
        }

        let cells: Option<Vec<P>> = rows.into_iter().flatten().collect();
        Grid::from_vec(width as u32, height as u32, cells?)
    }
}
