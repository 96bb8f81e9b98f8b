/// Parser for the `v` / `vn` / `f` subset of Wavefront OBJ text
use nom::{
    branch::alt,
    bytes::complete::take_till,
    character::complete::{char, space0, space1, u32 as index},
    combinator::{all_consuming, eof, peek},
    number::complete::float,
    sequence::{preceded, terminated},
    IResult,
};

use crate::error::{IndexKind, MeshError};
use crate::geometry::{MeshBuffer, FLOATS_PER_VERTEX};

/// One `p/t/n` reference inside a face record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct FaceEntry {
    position: u32,
    normal: u32,
}

/// Parse mesh text into an interleaved triangle list.
///
/// Faces may only reference positions and normals that appear earlier in the text.
/// Unknown record kinds and blank lines are skipped.
pub fn parse_obj(text: &str) -> Result<MeshBuffer, MeshError> {
    let mut positions: Vec<[f32; 3]> = Vec::new();
    let mut normals: Vec<[f32; 3]> = Vec::new();
    let mut vertices: Vec<f32> = Vec::new();

    for (number, raw) in text.lines().enumerate() {
        let line = number + 1;
        let record = raw.trim();
        let (keyword, rest) = match record.split_once(char::is_whitespace) {
            Some((keyword, rest)) => (keyword, rest),
            None => (record, ""),
        };

        match keyword {
            "v" => {
                let (_, position) = vector3(rest).map_err(|_| MeshError::InvalidRecord {
                    line,
                    keyword: "v",
                    reason: "expected three numbers",
                })?;
                positions.push(position);
            }
            "vn" => {
                let (_, normal) = vector3(rest).map_err(|_| MeshError::InvalidRecord {
                    line,
                    keyword: "vn",
                    reason: "expected three numbers",
                })?;
                normals.push(normal);
            }
            "f" => {
                let (_, entries) =
                    all_consuming(triangle)(rest).map_err(|_| MeshError::InvalidRecord {
                        line,
                        keyword: "f",
                        reason: "expected exactly three position/texture/normal entries",
                    })?;
                for entry in &entries {
                    let position = lookup(&positions, entry.position, IndexKind::Position, line)?;
                    let normal = lookup(&normals, entry.normal, IndexKind::Normal, line)?;
                    vertices.extend_from_slice(position);
                    vertices.extend_from_slice(normal);
                }
            }
            _ => {}
        }
    }

    log::info!(
        "Loaded mesh with {} vertices",
        vertices.len() / FLOATS_PER_VERTEX
    );
    MeshBuffer::new(vertices)
}

fn lookup(
    table: &[[f32; 3]],
    index: u32,
    kind: IndexKind,
    line: usize,
) -> Result<&[f32; 3], MeshError> {
    (index as usize)
        .checked_sub(1)
        .and_then(|slot| table.get(slot))
        .ok_or(MeshError::IndexOutOfRange {
            line,
            kind,
            index,
            available: table.len(),
        })
}

fn vector3(input: &str) -> IResult<&str, [f32; 3]> {
    let (input, x) = preceded(space0, component)(input)?;
    let (input, y) = preceded(space1, component)(input)?;
    let (input, z) = preceded(space1, component)(input)?;
    Ok((input, [x, y, z]))
}

/// A number that ends at whitespace or the end of the record
fn component(input: &str) -> IResult<&str, f32> {
    terminated(float, peek(alt((space1, eof))))(input)
}

fn triangle(input: &str) -> IResult<&str, [FaceEntry; 3]> {
    let (input, a) = preceded(space0, face_entry)(input)?;
    let (input, b) = preceded(space1, face_entry)(input)?;
    let (input, c) = preceded(space1, face_entry)(input)?;
    let (input, _) = space0(input)?;
    Ok((input, [a, b, c]))
}

fn face_entry(input: &str) -> IResult<&str, FaceEntry> {
    let (input, position) = index(input)?;
    let (input, _) = char('/')(input)?;
    // texture coordinates are not supported, whatever sits in the slot is skipped
    let (input, _) = take_till(|c: char| c == '/' || c.is_whitespace())(input)?;
    let (input, _) = char('/')(input)?;
    let (input, normal) = index(input)?;
    Ok((input, FaceEntry { position, normal }))
}

#[cfg(test)]
mod tests {
    use super::*;

    const TRIANGLE: &str = "v 0 0 0\nv 1 0 0\nv 0 1 0\nvn 0 0 1\nf 1/1/1 2/1/1 3/1/1\n";

    #[test]
    fn test_parse_single_triangle() {
        let mesh = parse_obj(TRIANGLE).unwrap();
        assert_eq!(mesh.vertex_count(), 3);
        assert_eq!(mesh.triangle_count(), 1);
        assert_eq!(
            mesh.vertices(),
            &[
                0.0, 0.0, 0.0, 0.0, 0.0, 1.0, //
                1.0, 0.0, 0.0, 0.0, 0.0, 1.0, //
                0.0, 1.0, 0.0, 0.0, 0.0, 1.0, //
            ]
        );
    }

    #[test]
    fn test_buffer_length_tracks_face_count() {
        let mut text = String::from("v 0 0 0\nv 1 0 0\nv 0 1 0\nv 1 1 0\nvn 0 0 1\nvn 0 1 0\n");
        for face in 0..7 {
            let n = face % 2 + 1;
            text.push_str(&format!("f 1/1/{n} 2/2/{n} {}/3/{n}\n", face % 2 + 3));
        }
        let mesh = parse_obj(&text).unwrap();
        assert_eq!(mesh.vertices().len(), 6 * 3 * 7);
        assert_eq!(mesh.vertex_count(), 3 * 7);
    }

    #[test]
    fn test_entries_copy_records_exactly() {
        let text = "v 0.1 -2.5e3 7.25\nv 1.3333333 0 0\nv 3 4 5\n\
                    vn 0.57735026 0.57735026 0.57735026\nvn -1 0 0\n\
                    f 3/9/2 1//1 2/42/2\n";
        let mesh = parse_obj(text).unwrap();
        let expect: [[f32; 6]; 3] = [
            [3.0, 4.0, 5.0, -1.0, 0.0, 0.0],
            [0.1, -2.5e3, 7.25, 0.57735026, 0.57735026, 0.57735026],
            [1.3333333, 0.0, 0.0, -1.0, 0.0, 0.0],
        ];
        for (i, row) in expect.iter().enumerate() {
            let got = &mesh.vertices()[i * 6..i * 6 + 6];
            for (a, b) in got.iter().zip(row.iter()) {
                assert_eq!(a.to_bits(), b.to_bits());
            }
        }
    }

    #[test]
    fn test_ignores_other_records_and_whitespace() {
        let text = "# exported mesh\r\no mug\r\n\r\nv 0 0 0  \r\nvt 0.5 0.5\r\nv 1 0 0\r\n\
                    v 0 1 0\t\r\nvn 0 0 1\r\ns off\r\nusemtl glaze\r\n  f 1/1/1 2/1/1 3/1/1   \r\n";
        let mesh = parse_obj(text).unwrap();
        assert_eq!(mesh.vertex_count(), 3);
    }

    #[test]
    fn test_empty_text_is_empty_mesh() {
        let mesh = parse_obj("").unwrap();
        assert!(mesh.is_empty());
        assert_eq!(mesh.vertex_count(), 0);
    }

    #[test]
    fn test_zero_index_is_rejected() {
        let text = "v 0 0 0\nvn 0 0 1\nf 0/1/1 1/1/1 1/1/1\n";
        assert_eq!(
            parse_obj(text),
            Err(MeshError::IndexOutOfRange {
                line: 3,
                kind: IndexKind::Position,
                index: 0,
                available: 1,
            })
        );
    }

    #[test]
    fn test_forward_reference_is_rejected() {
        let text = "v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1/1/1 2/1/1 3/1/1\nvn 0 0 1\n";
        assert_eq!(
            parse_obj(text),
            Err(MeshError::IndexOutOfRange {
                line: 4,
                kind: IndexKind::Normal,
                index: 1,
                available: 0,
            })
        );
    }

    #[test]
    fn test_index_past_end_is_rejected() {
        let text = "v 0 0 0\nv 1 0 0\nvn 0 0 1\nf 1/1/1 2/1/1 3/1/1\n";
        assert!(matches!(
            parse_obj(text),
            Err(MeshError::IndexOutOfRange {
                kind: IndexKind::Position,
                index: 3,
                ..
            })
        ));
    }

    #[test]
    fn test_only_triangles_are_accepted() {
        let quad = "v 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\nvn 0 0 1\nf 1/1/1 2/1/1 3/1/1 4/1/1\n";
        assert!(matches!(
            parse_obj(quad),
            Err(MeshError::InvalidRecord { line: 6, keyword: "f", .. })
        ));

        let line = "v 0 0 0\nvn 0 0 1\nf 1/1/1 1/1/1\n";
        assert!(parse_obj(line).is_err());
    }

    #[test]
    fn test_face_entry_needs_normal_index() {
        let text = "v 0 0 0\nvn 0 0 1\nf 1 1 1\n";
        assert!(matches!(
            parse_obj(text),
            Err(MeshError::InvalidRecord { keyword: "f", .. })
        ));
    }

    #[test]
    fn test_bad_vertex_numbers_are_rejected() {
        assert!(matches!(
            parse_obj("v 1 two 3\n"),
            Err(MeshError::InvalidRecord { line: 1, keyword: "v", .. })
        ));
        assert!(matches!(
            parse_obj("v 1 2 3\nvn 0 1\n"),
            Err(MeshError::InvalidRecord { line: 2, keyword: "vn", .. })
        ));
    }

    #[test]
    fn test_texture_slot_is_skipped() {
        for texture in ["4294967296", "-1", "x", "", "7"] {
            let text = format!(
                "v 0 0 0\nv 1 0 0\nv 0 1 0\nvn 0 0 1\n\
                 f 1/{texture}/1 2/{texture}/1 3/{texture}/1\n"
            );
            let mesh = parse_obj(&text).unwrap();
            assert_eq!(mesh.vertex_count(), 3, "texture slot {:?}", texture);
            assert_eq!(&mesh.vertices()[6..9], &[1.0, 0.0, 0.0]);
        }
    }

    #[test]
    fn test_trailing_garbage_on_numbers_is_rejected() {
        assert!(matches!(
            parse_obj("v 1 2 3.5.5\n"),
            Err(MeshError::InvalidRecord { line: 1, keyword: "v", .. })
        ));
        assert!(matches!(
            parse_obj("v 0 0 1\nv 1 2 3abc\n"),
            Err(MeshError::InvalidRecord { line: 2, keyword: "v", .. })
        ));
        assert!(matches!(
            parse_obj("vn 0 1e 0\n"),
            Err(MeshError::InvalidRecord { line: 1, keyword: "vn", .. })
        ));
    }

    #[test]
    fn test_homogeneous_component_is_ignored() {
        let mesh = parse_obj("v 1 2 3 1.0\nvn 0 0 1\nf 1//1 1//1 1//1\n").unwrap();
        assert_eq!(&mesh.vertices()[..3], &[1.0, 2.0, 3.0]);
    }
}
