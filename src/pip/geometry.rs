//! Ring assembly for OSM multipolygon relations.
//!
//! OSM boundary relations reference ways that are usually open segments of a
//! larger ring. These helpers stitch the segments back together and pair
//! inner rings with the outer ring that encloses them.

use std::collections::VecDeque;

use geo::{Contains, Coord, LineString, Polygon};

type Chain = Vec<Coord<f64>>;

/// Which end of a chain a segment meets, and in which direction it runs
#[derive(Debug, Clone, Copy)]
enum Splice {
    TailForward,
    TailReversed,
    HeadForward,
    HeadReversed,
}

fn splice_for(chain: &[Coord<f64>], segment: &[Coord<f64>]) -> Option<Splice> {
    let (head, tail) = (chain.first()?, chain.last()?);
    let (seg_first, seg_last) = (segment.first()?, segment.last()?);

    if tail == seg_first {
        Some(Splice::TailForward)
    } else if tail == seg_last {
        Some(Splice::TailReversed)
    } else if head == seg_last {
        Some(Splice::HeadForward)
    } else if head == seg_first {
        Some(Splice::HeadReversed)
    } else {
        None
    }
}

fn apply_splice(chain: &mut Chain, mut segment: Chain, splice: Splice) {
    if matches!(splice, Splice::TailReversed | Splice::HeadReversed) {
        segment.reverse();
    }

    match splice {
        Splice::TailForward | Splice::TailReversed => chain.extend(segment.into_iter().skip(1)),
        Splice::HeadForward | Splice::HeadReversed => {
            segment.pop();
            segment.append(chain);
            *chain = segment;
        }
    }
}

fn meets_itself(chain: &[Coord<f64>]) -> bool {
    chain.first() == chain.last()
}

/// Merge disconnected way segments into closed rings.
///
/// Segments are joined end-to-end (reversing where needed). A chain that
/// cannot be closed into a ring of at least four coordinates is discarded.
pub fn merge_segments_into_rings(segments: Vec<Chain>) -> Vec<LineString<f64>> {
    let mut pending: VecDeque<Chain> = segments.into_iter().filter(|s| s.len() >= 2).collect();
    let mut rings = Vec::new();

    while let Some(mut chain) = pending.pop_front() {
        while !meets_itself(&chain) {
            let Some((position, splice)) = pending
                .iter()
                .enumerate()
                .find_map(|(i, segment)| splice_for(&chain, segment).map(|s| (i, s)))
            else {
                break;
            };

            if let Some(segment) = pending.remove(position) {
                apply_splice(&mut chain, segment, splice);
            }
        }

        if meets_itself(&chain) && chain.len() >= 4 {
            rings.push(LineString::new(chain));
        }
    }

    rings
}

/// Build polygons from outer rings, attaching each inner ring as a hole of
/// the first outer ring that contains it. Inner rings with no enclosing outer
/// ring are dropped.
pub fn assemble_polygons(
    outers: Vec<LineString<f64>>,
    inners: Vec<LineString<f64>>,
) -> Vec<Polygon<f64>> {
    let shells: Vec<Polygon<f64>> = outers
        .into_iter()
        .map(|ring| Polygon::new(ring, vec![]))
        .collect();

    let mut holes: Vec<Vec<LineString<f64>>> = vec![Vec::new(); shells.len()];

    for inner in inners {
        let candidate = Polygon::new(inner.clone(), vec![]);
        if let Some(idx) = shells.iter().position(|shell| shell.contains(&candidate)) {
            holes[idx].push(inner);
        }
    }

    shells
        .into_iter()
        .zip(holes)
        .map(|(shell, interiors)| {
            let (exterior, _) = shell.into_inner();
            Polygon::new(exterior, interiors)
        })
        .collect()
}
