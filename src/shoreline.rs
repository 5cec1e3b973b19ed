//! Shoreline polygon loader.
//!
//! Reads a flat stream of fixed-layout binary ring records (the GSHHG
//! shoreline layout: big-endian 32-bit header fields followed by
//! micro-degree vertex pairs) and assembles polygons with holes from the
//! records' container references. Land rings become top-level polygons,
//! lake rings become their holes, island-in-lake rings become new top-level
//! polygons again, and so on.
//!
//! Containers are not assumed to precede their children: children arriving
//! before their container are parked and attached once it registers. Rings
//! whose container never appears are registered as top-level polygons at end
//! of stream, each with an explicit warning.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use log::{debug, warn};

use crate::error::{Error, Result};
use crate::geom::{Point, Polygon, SimplePolygon};
use crate::precision::Precision;

/// Micro-degrees per degree.
const MICRO_PER_DEGREE: i64 = 1_000_000;
/// The antimeridian in micro-degrees.
const ANTIMERIDIAN: i32 = 180_000_000;
/// A full turn in micro-degrees.
const FULL_TURN: i32 = 360_000_000;
/// Id field marking the end of the stream.
const END_SENTINEL: [u8; 4] = [0xFF; 4];
/// Vertex-count ceiling guarding against corrupt records.
const MAX_RING_VERTICES: i32 = 16_000_000;

/// Decoded ring flag bitfield.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RingFlags {
    /// Nesting level: 1 land, 2 lake, 3 island-in-lake, 4 pond-in-island.
    pub level: u8,
    /// Dataset release version.
    pub version: u8,
    /// Whether the ring crosses the Greenwich meridian.
    pub greenwich: bool,
    /// Data source (0 = WDBII, 1 = WVS).
    pub source: u8,
    /// Whether the ring is a river-lake.
    pub river: bool,
}

impl RingFlags {
    /// Decode the packed flag field.
    #[must_use]
    pub fn decode(flag: i32) -> Self {
        Self {
            level: (flag & 0xFF) as u8,
            version: ((flag >> 8) & 0xFF) as u8,
            greenwich: (flag >> 16) & 1 == 1,
            source: ((flag >> 24) & 1) as u8,
            river: (flag >> 25) & 1 == 1,
        }
    }
}

/// One decoded ring record: header fields plus antimeridian-corrected
/// micro-degree vertices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RingRecord {
    /// Source ring id.
    pub id: i32,
    /// Decoded flag bitfield.
    pub flags: RingFlags,
    /// Western extent in micro-degrees.
    pub west: i32,
    /// Eastern extent in micro-degrees.
    pub east: i32,
    /// Southern extent in micro-degrees.
    pub south: i32,
    /// Northern extent in micro-degrees.
    pub north: i32,
    /// Ring area in tenths of km^2.
    pub area: i32,
    /// Full-resolution ancestor area in tenths of km^2.
    pub area_full: i32,
    /// Id of the enclosing ring, -1 for none.
    pub container: i32,
    /// Id of the full-resolution ancestor ring, -1 for none.
    pub ancestor: i32,
    /// `(x, y)` vertex pairs in micro-degrees, antimeridian-corrected.
    pub vertices: Vec<(i32, i32)>,
}

/// A recoverable problem encountered while loading. The ring involved is
/// skipped or reassigned and the load continues.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoadWarning {
    /// A ring whose boundary could not be built as a polygon.
    #[error("ring {id} skipped: {message}")]
    DegenerateRing {
        /// Source ring id.
        id: i32,
        /// Construction failure description.
        message: String,
    },
    /// A ring whose container never appeared in the stream; it was
    /// registered as a top-level polygon instead of a hole.
    #[error("ring {id} references container {container} which never resolved; registered top-level")]
    UnresolvedContainer {
        /// Source ring id.
        id: i32,
        /// The missing container id.
        container: i32,
    },
    /// The stream ended or broke mid-record; rings decoded before the break
    /// are kept.
    #[error("stream aborted after {records} complete records: {message}")]
    Format {
        /// Number of complete records decoded before the failure.
        records: usize,
        /// Failure description.
        message: String,
    },
}

/// One assembled shoreline polygon with its source metadata.
#[derive(Debug, Clone)]
pub struct ShorelinePolygon<S> {
    /// Id of the ring that formed the exterior boundary.
    pub source_id: i32,
    /// The exterior ring's flags.
    pub flags: RingFlags,
    /// The polygon, holes in attachment order.
    pub polygon: Polygon<S>,
}

/// The result of loading a shoreline stream: polygons in registration order
/// plus the warnings accumulated along the way.
#[derive(Debug, Clone)]
pub struct ShorelineSet<S> {
    /// Assembled polygons; the index is the output id.
    pub polygons: Vec<ShorelinePolygon<S>>,
    /// Recoverable problems, in encounter order.
    pub warnings: Vec<LoadWarning>,
}

/// Load a shoreline file. A missing or unopenable file is an error; any
/// failure past that point degrades to warnings in the returned set.
pub fn load<P: Precision>(path: impl AsRef<Path>, ctx: &P) -> Result<ShorelineSet<P::Scalar>> {
    let file = File::open(path)?;
    Ok(read(BufReader::new(file), ctx))
}

/// Read a shoreline stream to the end sentinel, end of file, or first
/// undecodable record.
pub fn read<P: Precision, R: Read>(mut reader: R, ctx: &P) -> ShorelineSet<P::Scalar> {
    let mut assembler = Assembler::new();
    let mut warnings = Vec::new();
    let mut records = 0usize;

    loop {
        match read_record(&mut reader) {
            Ok(None) => break,
            Ok(Some(record)) => {
                debug!(
                    "ring id={} level={} n={} container={}",
                    record.id,
                    record.flags.level,
                    record.vertices.len(),
                    record.container
                );
                let points: Vec<Point<P::Scalar>> = record
                    .vertices
                    .iter()
                    .map(|&(x, y)| {
                        Point::new(
                            ctx.ratio(i64::from(x), MICRO_PER_DEGREE),
                            ctx.ratio(i64::from(y), MICRO_PER_DEGREE),
                        )
                    })
                    .collect();
                match SimplePolygon::new(points, ctx) {
                    Ok(boundary) => assembler.place(Parked {
                        id: record.id,
                        flags: record.flags,
                        container: record.container,
                        boundary,
                    }),
                    Err(e) => {
                        warn!("ring {} skipped: {e}", record.id);
                        warnings.push(LoadWarning::DegenerateRing {
                            id: record.id,
                            message: e.to_string(),
                        });
                    }
                }
                records += 1;
            }
            Err(e) => {
                warn!("shoreline stream aborted: {e}");
                warnings.push(LoadWarning::Format {
                    records,
                    message: e.to_string(),
                });
                break;
            }
        }
    }

    let (polygons, mut assembly_warnings) = assembler.finish();
    warnings.append(&mut assembly_warnings);
    ShorelineSet { polygons, warnings }
}

/// Decode the next record. `Ok(None)` on the end sentinel or a clean end of
/// file; errors on truncation mid-record or nonsensical vertex counts.
pub fn read_record<R: Read>(reader: &mut R) -> Result<Option<RingRecord>> {
    let mut id_buf = [0u8; 4];
    match read_fully(reader, &mut id_buf) {
        ReadOutcome::Eof => return Ok(None),
        ReadOutcome::Partial => {
            return Err(Error::Io(std::io::Error::new(
                std::io::ErrorKind::UnexpectedEof,
                "stream ended inside a record id",
            )))
        }
        ReadOutcome::Full => {}
    }
    if id_buf == END_SENTINEL {
        return Ok(None);
    }
    let id = i32::from_be_bytes(id_buf);

    let n = read_i32(reader)?;
    let flag = read_i32(reader)?;
    let west = read_i32(reader)?;
    let east = read_i32(reader)?;
    let south = read_i32(reader)?;
    let north = read_i32(reader)?;
    let area = read_i32(reader)?;
    let area_full = read_i32(reader)?;
    let container = read_i32(reader)?;
    let ancestor = read_i32(reader)?;

    if n <= 0 || n > MAX_RING_VERTICES {
        return Err(Error::MalformedRecord {
            id,
            message: format!("vertex count {n} out of range"),
        });
    }

    let mut vertices = Vec::with_capacity(n as usize);
    let mut prev_x: Option<i32> = None;
    for _ in 0..n {
        let mut x = read_i32(reader)?;
        let y = read_i32(reader)?;
        // Keep longitudes monotonic across the antimeridian: a jump over
        // the 180-degree line gains or loses a full turn relative to the
        // corrected predecessor.
        if let Some(px) = prev_x {
            if px > ANTIMERIDIAN && x < ANTIMERIDIAN {
                x += FULL_TURN;
            } else if px < ANTIMERIDIAN && x > ANTIMERIDIAN {
                x -= FULL_TURN;
            }
        }
        prev_x = Some(x);
        vertices.push((x, y));
    }

    Ok(Some(RingRecord {
        id,
        flags: RingFlags::decode(flag),
        west,
        east,
        south,
        north,
        area,
        area_full,
        container,
        ancestor,
        vertices,
    }))
}

enum ReadOutcome {
    Full,
    Partial,
    Eof,
}

fn read_fully<R: Read>(reader: &mut R, buf: &mut [u8]) -> ReadOutcome {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => {
                return if filled == 0 {
                    ReadOutcome::Eof
                } else {
                    ReadOutcome::Partial
                }
            }
            Ok(k) => filled += k,
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => {}
            Err(_) => return ReadOutcome::Partial,
        }
    }
    ReadOutcome::Full
}

fn read_i32<R: Read>(reader: &mut R) -> Result<i32> {
    let mut buf = [0u8; 4];
    reader.read_exact(&mut buf)?;
    Ok(i32::from_be_bytes(buf))
}

/// A decoded ring waiting for (or undergoing) placement.
struct Parked<S> {
    id: i32,
    flags: RingFlags,
    container: i32,
    boundary: SimplePolygon<S>,
}

/// Incremental container resolution.
///
/// `top_level` maps ring ids registered as polygons to their output index;
/// `holes` holds ring ids attached as holes. A ring whose container is a
/// hole starts a new polygon (an island inside a lake); a ring whose
/// container is a polygon becomes one of its holes; anything else parks
/// until its container shows up.
struct Assembler<S> {
    polygons: Vec<ShorelinePolygon<S>>,
    top_level: HashMap<i32, usize>,
    holes: HashSet<i32>,
    pending: BTreeMap<i32, Vec<Parked<S>>>,
    warnings: Vec<LoadWarning>,
}

impl<S: crate::precision::Scalar> Assembler<S> {
    fn new() -> Self {
        Self {
            polygons: Vec::new(),
            top_level: HashMap::new(),
            holes: HashSet::new(),
            pending: BTreeMap::new(),
            warnings: Vec::new(),
        }
    }

    fn place(&mut self, ring: Parked<S>) {
        if ring.container == -1 || self.holes.contains(&ring.container) {
            self.register_top(ring);
        } else if let Some(&idx) = self.top_level.get(&ring.container) {
            self.attach_hole(idx, ring);
        } else {
            self.pending.entry(ring.container).or_default().push(ring);
        }
    }

    fn register_top(&mut self, ring: Parked<S>) {
        let idx = self.polygons.len();
        self.top_level.insert(ring.id, idx);
        self.polygons.push(ShorelinePolygon {
            source_id: ring.id,
            flags: ring.flags,
            polygon: Polygon::new(ring.boundary),
        });
        if let Some(children) = self.pending.remove(&ring.id) {
            for child in children {
                self.attach_hole(idx, child);
            }
        }
    }

    fn attach_hole(&mut self, idx: usize, ring: Parked<S>) {
        let id = ring.id;
        self.holes.insert(id);
        self.polygons[idx].polygon.push_hole(ring.boundary);
        if let Some(children) = self.pending.remove(&id) {
            for child in children {
                self.register_top(child);
            }
        }
    }

    /// Flush: every still-parked ring registers as a top-level polygon with
    /// an explicit warning.
    fn finish(mut self) -> (Vec<ShorelinePolygon<S>>, Vec<LoadWarning>) {
        let parked = std::mem::take(&mut self.pending);
        for (container, rings) in parked {
            for ring in rings {
                warn!(
                    "ring {} container {container} never resolved; keeping it top-level",
                    ring.id
                );
                self.warnings.push(LoadWarning::UnresolvedContainer {
                    id: ring.id,
                    container,
                });
                self.register_top(ring);
            }
        }
        (self.polygons, self.warnings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::precision::{FloatPrecision, RationalPrecision};
    use std::io::Cursor;

    /// Encode one record in the stream layout.
    fn record_bytes(id: i32, container: i32, level: i32, vertices: &[(i32, i32)]) -> Vec<u8> {
        let mut out = Vec::new();
        let flag = level | (12 << 8);
        let fields = [
            id,
            vertices.len() as i32,
            flag,
            0,
            0,
            0,
            0,
            10,
            10,
            container,
            -1,
        ];
        for f in fields {
            out.extend_from_slice(&f.to_be_bytes());
        }
        for &(x, y) in vertices {
            out.extend_from_slice(&x.to_be_bytes());
            out.extend_from_slice(&y.to_be_bytes());
        }
        out
    }

    /// A square ring in micro-degrees, `side` degrees on a side.
    fn square_deg(origin_deg: i32, side_deg: i32) -> Vec<(i32, i32)> {
        let o = origin_deg * 1_000_000;
        let s = side_deg * 1_000_000;
        vec![(o, o), (o + s, o), (o + s, o + s), (o, o + s)]
    }

    #[test]
    fn test_flags_decode() {
        let flags = RingFlags::decode(2 | (12 << 8) | (1 << 16) | (1 << 24) | (1 << 25));
        assert_eq!(flags.level, 2);
        assert_eq!(flags.version, 12);
        assert!(flags.greenwich);
        assert_eq!(flags.source, 1);
        assert!(flags.river);

        let land = RingFlags::decode(1 | (12 << 8));
        assert_eq!(land.level, 1);
        assert!(!land.greenwich);
        assert!(!land.river);
    }

    #[test]
    fn test_single_ring() {
        let ctx = FloatPrecision::default();
        let bytes = record_bytes(0, -1, 1, &square_deg(0, 10));
        let set = read(Cursor::new(bytes), &ctx);
        assert!(set.warnings.is_empty());
        assert_eq!(set.polygons.len(), 1);
        assert_eq!(set.polygons[0].source_id, 0);
        assert_eq!(set.polygons[0].flags.level, 1);
        assert!(set.polygons[0].polygon.holes().is_empty());
    }

    #[test]
    fn test_end_sentinel_stops_reading() {
        let ctx = FloatPrecision::default();
        let mut bytes = record_bytes(0, -1, 1, &square_deg(0, 10));
        bytes.extend_from_slice(&END_SENTINEL);
        bytes.extend_from_slice(&record_bytes(1, -1, 1, &square_deg(40, 10)));
        let set = read(Cursor::new(bytes), &ctx);
        assert_eq!(set.polygons.len(), 1);
        assert!(set.warnings.is_empty());
    }

    #[test]
    fn test_land_lake_island_hierarchy() {
        let ctx = FloatPrecision::default();
        let mut bytes = record_bytes(0, -1, 1, &square_deg(0, 20));
        bytes.extend_from_slice(&record_bytes(1, 0, 2, &square_deg(4, 10)));
        bytes.extend_from_slice(&record_bytes(2, 1, 3, &square_deg(6, 4)));
        let set = read(Cursor::new(bytes), &ctx);

        assert!(set.warnings.is_empty());
        // Land with the lake as a hole, then the island as its own polygon.
        assert_eq!(set.polygons.len(), 2);
        assert_eq!(set.polygons[0].source_id, 0);
        assert_eq!(set.polygons[0].polygon.holes().len(), 1);
        assert_eq!(set.polygons[1].source_id, 2);
        assert!(set.polygons[1].polygon.holes().is_empty());
    }

    #[test]
    fn test_forward_referenced_container_attaches() {
        let ctx = FloatPrecision::default();
        // Lake arrives before its land container.
        let mut bytes = record_bytes(5, 9, 2, &square_deg(4, 10));
        bytes.extend_from_slice(&record_bytes(9, -1, 1, &square_deg(0, 20)));
        let set = read(Cursor::new(bytes), &ctx);

        assert!(set.warnings.is_empty());
        assert_eq!(set.polygons.len(), 1);
        assert_eq!(set.polygons[0].source_id, 9);
        assert_eq!(set.polygons[0].polygon.holes().len(), 1);
    }

    #[test]
    fn test_unresolved_container_registers_with_warning() {
        let ctx = FloatPrecision::default();
        let bytes = record_bytes(3, 99, 2, &square_deg(0, 10));
        let set = read(Cursor::new(bytes), &ctx);

        assert_eq!(set.polygons.len(), 1);
        assert_eq!(set.polygons[0].source_id, 3);
        assert_eq!(
            set.warnings,
            vec![LoadWarning::UnresolvedContainer { id: 3, container: 99 }]
        );
    }

    #[test]
    fn test_antimeridian_eastward_crossing() {
        let mut bytes = record_bytes(
            0,
            -1,
            1,
            &[
                (179_900_000, 0),
                (180_100_000, 1_000_000),
                (179_900_000, 2_000_000),
            ],
        );
        bytes.extend_from_slice(&END_SENTINEL);
        let record = read_record(&mut Cursor::new(bytes))
            .expect("decodes")
            .expect("one record");
        // Crossing right over 180 degrees loses a full turn. The third
        // vertex is back below the threshold on both sides of its pair, so
        // it is left as read.
        assert_eq!(record.vertices[0].0, 179_900_000);
        assert_eq!(record.vertices[1].0, -179_900_000);
        assert_eq!(record.vertices[2].0, 179_900_000);
    }

    #[test]
    fn test_antimeridian_westward_crossing() {
        let bytes = record_bytes(0, -1, 1, &[(180_100_000, 0), (179_900_000, 1_000_000)]);
        let record = read_record(&mut Cursor::new(bytes))
            .expect("decodes")
            .expect("one record");
        assert_eq!(record.vertices[1].0, 179_900_000 + 360_000_000);
    }

    #[test]
    fn test_truncated_header_keeps_earlier_polygons() {
        let ctx = FloatPrecision::default();
        let mut bytes = record_bytes(0, -1, 1, &square_deg(0, 10));
        // Next record breaks off inside the header.
        bytes.extend_from_slice(&1i32.to_be_bytes());
        bytes.extend_from_slice(&[0, 0]);
        let set = read(Cursor::new(bytes), &ctx);

        assert_eq!(set.polygons.len(), 1);
        assert!(matches!(
            set.warnings.as_slice(),
            [LoadWarning::Format { records: 1, .. }]
        ));
    }

    #[test]
    fn test_degenerate_ring_skipped() {
        let ctx = FloatPrecision::default();
        // Two-vertex ring cannot form a polygon.
        let mut bytes = record_bytes(0, -1, 1, &[(0, 0), (1_000_000, 0)]);
        bytes.extend_from_slice(&record_bytes(1, -1, 1, &square_deg(5, 10)));
        let set = read(Cursor::new(bytes), &ctx);

        assert_eq!(set.polygons.len(), 1);
        assert_eq!(set.polygons[0].source_id, 1);
        assert!(matches!(
            set.warnings.as_slice(),
            [LoadWarning::DegenerateRing { id: 0, .. }]
        ));
    }

    #[test]
    fn test_bad_vertex_count_aborts() {
        let ctx = FloatPrecision::default();
        let mut bytes = Vec::new();
        let fields = [7i32, -5, 1, 0, 0, 0, 0, 0, 0, -1, -1];
        for f in fields {
            bytes.extend_from_slice(&f.to_be_bytes());
        }
        let set = read(Cursor::new(bytes), &ctx);
        assert!(set.polygons.is_empty());
        assert!(matches!(
            set.warnings.as_slice(),
            [LoadWarning::Format { records: 0, .. }]
        ));
    }

    #[test]
    fn test_exact_backend_micro_degree_ratio() {
        let ctx = RationalPrecision::default();
        let bytes = record_bytes(0, -1, 1, &square_deg(0, 10));
        let set = read(Cursor::new(bytes), &ctx);
        assert_eq!(set.polygons.len(), 1);
        let pts = set.polygons[0].polygon.exterior().ring().points();
        assert_eq!(pts[1].x, ctx.from_i64(10));
        assert_eq!(pts[1].y, ctx.from_i64(0));
    }
}
