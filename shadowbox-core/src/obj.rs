/// Wavefront OBJ loader (positions and polygon faces)
use std::fs;
use std::path::Path;

use log::{debug, info};
use nalgebra::Point3;
use nom::{
    bytes::complete::{take_till1, take_while},
    character::complete::{char, i64 as index, space0, space1},
    combinator::{all_consuming, opt},
    multi::many1,
    number::complete::float,
    sequence::{preceded, terminated, tuple},
    IResult,
};

use crate::error::LoadError;
use crate::geometry::Mesh;

/// Read, parse and normalise an OBJ file.
pub fn load_obj(path: impl AsRef<Path>) -> Result<Mesh, LoadError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut mesh = parse_obj(&text)?;
    mesh.center_and_scale();
    info!(
        "loaded {} ({} triangles)",
        path.display(),
        mesh.triangles.len()
    );
    Ok(mesh)
}

/// Parse OBJ text into a triangle mesh without rescaling it.
///
/// Only `v` and `f` statements are interpreted; texture coordinates,
/// normals, groups and materials are skipped.
pub fn parse_obj(input: &str) -> Result<Mesh, LoadError> {
    let mut positions: Vec<Point3<f32>> = Vec::new();
    let mut faces: Vec<Vec<usize>> = Vec::new();

    for (number, raw) in input.lines().enumerate() {
        let line = number + 1;
        let content = raw.split('#').next().unwrap_or("").trim();
        if content.is_empty() {
            continue;
        }

        let (rest, keyword) = keyword(content).map_err(|e| parse_error(line, e))?;
        match keyword {
            "v" => {
                let (_, position) = all_consuming(vertex)(rest).map_err(|e| parse_error(line, e))?;
                positions.push(position);
            }
            "f" => {
                let (_, indices) = all_consuming(face)(rest).map_err(|e| parse_error(line, e))?;
                let face = indices
                    .into_iter()
                    .map(|i| resolve_index(i, positions.len(), line))
                    .collect::<Result<Vec<_>, _>>()?;
                faces.push(face);
            }
            other => debug!("line {}: skipping '{}' statement", line, other),
        }
    }

    let mesh = Mesh::from_polygons(&positions, &faces);
    if mesh.is_empty() {
        return Err(LoadError::EmptyModel);
    }
    Ok(mesh)
}

fn parse_error(line: usize, error: nom::Err<nom::error::Error<&str>>) -> LoadError {
    LoadError::Parse {
        line,
        message: format!("{:?}", error),
    }
}

/// Map a 1-based (or negative, end-relative) OBJ index to a 0-based one.
fn resolve_index(raw: i64, count: usize, line: usize) -> Result<usize, LoadError> {
    let resolved = if raw > 0 {
        raw - 1
    } else if raw < 0 {
        count as i64 + raw
    } else {
        -1
    };
    if resolved < 0 || resolved >= count as i64 {
        return Err(LoadError::IndexOutOfRange {
            line,
            index: raw,
            count,
        });
    }
    Ok(resolved as usize)
}

fn keyword(input: &str) -> IResult<&str, &str> {
    take_till1(|c: char| c.is_whitespace())(input)
}

fn vertex(input: &str) -> IResult<&str, Point3<f32>> {
    let (input, (x, y, z)) = tuple((
        preceded(space1, float),
        preceded(space1, float),
        preceded(space1, float),
    ))(input)?;
    // Optional w component
    let (input, _) = opt(preceded(space1, float))(input)?;
    let (input, _) = space0(input)?;
    Ok((input, Point3::new(x, y, z)))
}

fn face(input: &str) -> IResult<&str, Vec<i64>> {
    terminated(many1(preceded(space1, face_corner)), space0)(input)
}

/// `v`, `v/vt`, `v//vn` or `v/vt/vn`; only the position index is kept.
fn face_corner(input: &str) -> IResult<&str, i64> {
    let (input, position) = index(input)?;
    let (input, _) = opt(preceded(
        char('/'),
        take_while(|c: char| c == '/' || c == '-' || c.is_ascii_digit()),
    ))(input)?;
    Ok((input, position))
}
