//! # Primitive Shape Generation
//!
//! Generators for the shapes the product catalog uses. All shapes are
//! Y-up, centered at the origin, with outward normals and texture
//! coordinates from 0 to 1.

use super::GeometryData;
use std::f32::consts::PI;

/// Generate an axis-aligned box
///
/// # Arguments
/// * `width` - Extent along X
/// * `height` - Extent along Y
/// * `depth` - Extent along Z
///
/// Each face carries its own four vertices so normals stay flat.
pub fn generate_box(width: f32, height: f32, depth: f32) -> GeometryData {
    let mut data = GeometryData::new();

    let hw = width * 0.5;
    let hh = height * 0.5;
    let hd = depth * 0.5;

    let positions = [
        // Front face (positive Z)
        [-hw, -hh, hd],
        [hw, -hh, hd],
        [hw, hh, hd],
        [-hw, hh, hd],
        // Back face (negative Z)
        [-hw, -hh, -hd],
        [-hw, hh, -hd],
        [hw, hh, -hd],
        [hw, -hh, -hd],
        // Left face (negative X)
        [-hw, -hh, -hd],
        [-hw, -hh, hd],
        [-hw, hh, hd],
        [-hw, hh, -hd],
        // Right face (positive X)
        [hw, -hh, hd],
        [hw, -hh, -hd],
        [hw, hh, -hd],
        [hw, hh, hd],
        // Top face (positive Y)
        [-hw, hh, hd],
        [hw, hh, hd],
        [hw, hh, -hd],
        [-hw, hh, -hd],
        // Bottom face (negative Y)
        [-hw, -hh, -hd],
        [hw, -hh, -hd],
        [hw, -hh, hd],
        [-hw, -hh, hd],
    ];

    let tex_coords = [
        [0.0, 0.0],
        [1.0, 0.0],
        [1.0, 1.0],
        [0.0, 1.0],
        [1.0, 0.0],
        [1.0, 1.0],
        [0.0, 1.0],
        [0.0, 0.0],
        [1.0, 0.0],
        [0.0, 0.0],
        [0.0, 1.0],
        [1.0, 1.0],
        [0.0, 0.0],
        [1.0, 0.0],
        [1.0, 1.0],
        [0.0, 1.0],
        [0.0, 1.0],
        [1.0, 1.0],
        [1.0, 0.0],
        [0.0, 0.0],
        [0.0, 0.0],
        [1.0, 0.0],
        [1.0, 1.0],
        [0.0, 1.0],
    ];

    let normals = [
        [0.0, 0.0, 1.0],
        [0.0, 0.0, 1.0],
        [0.0, 0.0, 1.0],
        [0.0, 0.0, 1.0],
        [0.0, 0.0, -1.0],
        [0.0, 0.0, -1.0],
        [0.0, 0.0, -1.0],
        [0.0, 0.0, -1.0],
        [-1.0, 0.0, 0.0],
        [-1.0, 0.0, 0.0],
        [-1.0, 0.0, 0.0],
        [-1.0, 0.0, 0.0],
        [1.0, 0.0, 0.0],
        [1.0, 0.0, 0.0],
        [1.0, 0.0, 0.0],
        [1.0, 0.0, 0.0],
        [0.0, 1.0, 0.0],
        [0.0, 1.0, 0.0],
        [0.0, 1.0, 0.0],
        [0.0, 1.0, 0.0],
        [0.0, -1.0, 0.0],
        [0.0, -1.0, 0.0],
        [0.0, -1.0, 0.0],
        [0.0, -1.0, 0.0],
    ];

    data.vertices = positions.to_vec();
    data.tex_coords = tex_coords.to_vec();
    data.normals = normals.to_vec();

    // Two counter-clockwise triangles per face
    data.indices = vec![
        0, 1, 2, 2, 3, 0, // front
        4, 5, 6, 6, 7, 4, // back
        8, 9, 10, 10, 11, 8, // left
        12, 13, 14, 14, 15, 12, // right
        16, 17, 18, 18, 19, 16, // top
        20, 21, 22, 22, 23, 20, // bottom
    ];

    data
}

/// Generate a capped cylinder along the Y axis
///
/// # Arguments
/// * `radius` - Radius of the cylinder
/// * `height` - Height of the cylinder (along Y)
/// * `segments` - Number of radial segments
///
/// Side normals are smooth; the caps carry their own flat-normal ring.
pub fn generate_cylinder(radius: f32, height: f32, segments: u32) -> GeometryData {
    let mut data = GeometryData::new();

    let segs = segments.max(3);
    let half_height = height * 0.5;

    // Side vertices, duplicated at the seam so UVs wrap cleanly
    for i in 0..=segs {
        let angle = i as f32 * 2.0 * PI / segs as f32;
        let cos_a = angle.cos();
        let sin_a = angle.sin();
        let x = radius * cos_a;
        let z = radius * sin_a;

        data.vertices.push([x, -half_height, z]);
        data.normals.push([cos_a, 0.0, sin_a]);
        data.tex_coords.push([i as f32 / segs as f32, 0.0]);

        data.vertices.push([x, half_height, z]);
        data.normals.push([cos_a, 0.0, sin_a]);
        data.tex_coords.push([i as f32 / segs as f32, 1.0]);
    }

    // Side faces
    for i in 0..segs {
        let bottom_current = i * 2;
        let top_current = bottom_current + 1;
        let bottom_next = (i + 1) * 2;
        let top_next = bottom_next + 1;

        data.indices.push(bottom_current);
        data.indices.push(top_current);
        data.indices.push(bottom_next);

        data.indices.push(top_current);
        data.indices.push(top_next);
        data.indices.push(bottom_next);
    }

    // Cap rings with flat normals, plus center vertices
    let bottom_ring_start = data.vertices.len() as u32;
    for i in 0..=segs {
        let angle = i as f32 * 2.0 * PI / segs as f32;
        let x = radius * angle.cos();
        let z = radius * angle.sin();
        data.vertices.push([x, -half_height, z]);
        data.normals.push([0.0, -1.0, 0.0]);
        data.tex_coords.push([angle.cos() * 0.5 + 0.5, angle.sin() * 0.5 + 0.5]);
    }

    let top_ring_start = data.vertices.len() as u32;
    for i in 0..=segs {
        let angle = i as f32 * 2.0 * PI / segs as f32;
        let x = radius * angle.cos();
        let z = radius * angle.sin();
        data.vertices.push([x, half_height, z]);
        data.normals.push([0.0, 1.0, 0.0]);
        data.tex_coords.push([angle.cos() * 0.5 + 0.5, angle.sin() * 0.5 + 0.5]);
    }

    let center_bottom_idx = data.vertices.len() as u32;
    data.vertices.push([0.0, -half_height, 0.0]);
    data.normals.push([0.0, -1.0, 0.0]);
    data.tex_coords.push([0.5, 0.5]);

    let center_top_idx = data.vertices.len() as u32;
    data.vertices.push([0.0, half_height, 0.0]);
    data.normals.push([0.0, 1.0, 0.0]);
    data.tex_coords.push([0.5, 0.5]);

    // Bottom cap faces down
    for i in 0..segs {
        data.indices.push(center_bottom_idx);
        data.indices.push(bottom_ring_start + i);
        data.indices.push(bottom_ring_start + i + 1);
    }

    // Top cap faces up
    for i in 0..segs {
        data.indices.push(center_top_idx);
        data.indices.push(top_ring_start + i + 1);
        data.indices.push(top_ring_start + i);
    }

    data
}

/// Generate a UV sphere
///
/// # Arguments
/// * `radius` - Radius of the sphere
/// * `longitude_segments` - Number of vertical segments (longitude lines)
/// * `latitude_segments` - Number of horizontal segments (latitude lines)
pub fn generate_sphere(radius: f32, longitude_segments: u32, latitude_segments: u32) -> GeometryData {
    let mut data = GeometryData::new();

    let long_segs = longitude_segments.max(3);
    let lat_segs = latitude_segments.max(2);

    for lat in 0..=lat_segs {
        let theta = lat as f32 * PI / lat_segs as f32; // 0 to PI, pole to pole
        let sin_theta = theta.sin();
        let cos_theta = theta.cos();

        for long in 0..=long_segs {
            let phi = long as f32 * 2.0 * PI / long_segs as f32;
            let sin_phi = phi.sin();
            let cos_phi = phi.cos();

            let nx = sin_theta * cos_phi;
            let ny = cos_theta;
            let nz = sin_theta * sin_phi;

            data.vertices.push([radius * nx, radius * ny, radius * nz]);
            data.normals.push([nx, ny, nz]);

            let u = long as f32 / long_segs as f32;
            let v = lat as f32 / lat_segs as f32;
            data.tex_coords.push([u, v]);
        }
    }

    // Longitude advances clockwise seen from above, so the outward winding
    // walks the ring vertex before the next row
    for lat in 0..lat_segs {
        for long in 0..long_segs {
            let first = lat * (long_segs + 1) + long;
            let second = first + long_segs + 1;

            data.indices.push(first);
            data.indices.push(first + 1);
            data.indices.push(second);

            data.indices.push(second);
            data.indices.push(first + 1);
            data.indices.push(second + 1);
        }
    }

    data
}

/// Generate a flat ground plane in the XZ plane
///
/// # Arguments
/// * `width` - Extent along X
/// * `depth` - Extent along Z
/// * `width_segments` - Number of subdivisions along width
/// * `depth_segments` - Number of subdivisions along depth
///
/// Returns a plane centered at the origin with the normal pointing up
/// (positive Y).
pub fn generate_plane(width: f32, depth: f32, width_segments: u32, depth_segments: u32) -> GeometryData {
    let mut data = GeometryData::new();

    let w_segs = width_segments.max(1);
    let d_segs = depth_segments.max(1);

    for z in 0..=d_segs {
        let v = z as f32 / d_segs as f32;
        let pos_z = (v - 0.5) * depth;

        for x in 0..=w_segs {
            let u = x as f32 / w_segs as f32;
            let pos_x = (u - 0.5) * width;

            data.vertices.push([pos_x, 0.0, pos_z]);
            data.normals.push([0.0, 1.0, 0.0]);
            data.tex_coords.push([u, v]);
        }
    }

    // Counter-clockwise when viewed from above
    for z in 0..d_segs {
        for x in 0..w_segs {
            let i = z * (w_segs + 1) + x;
            let next_row = i + w_segs + 1;

            data.indices.push(i);
            data.indices.push(next_row);
            data.indices.push(i + 1);

            data.indices.push(next_row);
            data.indices.push(next_row + 1);
            data.indices.push(i + 1);
        }
    }

    data
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_box_generation() {
        let seat = generate_box(2.0, 0.2, 2.0);
        assert_eq!(seat.vertices.len(), 24); // 6 faces * 4 vertices
        assert_eq!(seat.indices.len(), 36); // 6 faces * 2 triangles * 3 indices
        assert_eq!(seat.vertex_count(), 24);
        assert_eq!(seat.triangle_count(), 12);

        // The box spans exactly the requested extents
        let max_y = seat
            .vertices
            .iter()
            .map(|v| v[1])
            .fold(f32::NEG_INFINITY, f32::max);
        let min_y = seat.vertices.iter().map(|v| v[1]).fold(f32::INFINITY, f32::min);
        assert_eq!(max_y, 0.1);
        assert_eq!(min_y, -0.1);
    }

    #[test]
    fn test_cylinder_generation() {
        let segs = 16;
        let leg = generate_cylinder(0.08, 1.5, segs);

        // Sides: 2 * (segs + 1), caps: 2 * (segs + 1) rings + 2 centers
        assert_eq!(leg.vertices.len() as u32, 4 * (segs + 1) + 2);
        // Sides: 6 per segment, caps: 3 per segment each
        assert_eq!(leg.indices.len() as u32, segs * 12);
        assert_eq!(leg.vertices.len(), leg.normals.len());

        // Cylinder extends along Y only
        for v in &leg.vertices {
            assert!(v[1].abs() <= 0.75 + 1e-6);
            assert!((v[0] * v[0] + v[2] * v[2]).sqrt() <= 0.08 + 1e-6);
        }
    }

    #[test]
    fn test_sphere_generation() {
        let sphere = generate_sphere(1.0, 8, 6);
        assert_eq!(sphere.vertices.len(), (8 + 1) * (6 + 1));
        assert_eq!(sphere.indices.len(), 8 * 6 * 6);
        assert_eq!(sphere.vertices.len(), sphere.normals.len());
        assert_eq!(sphere.vertices.len(), sphere.tex_coords.len());

        // All vertices sit on the sphere surface
        for v in &sphere.vertices {
            let r = (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt();
            assert!((r - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn test_plane_generation() {
        let ground = generate_plane(20.0, 20.0, 2, 2);
        assert_eq!(ground.vertices.len(), 9); // 3x3 grid
        assert_eq!(ground.indices.len(), 24); // 4 quads * 2 triangles * 3 indices

        // Flat in Y, normals straight up
        for (v, n) in ground.vertices.iter().zip(ground.normals.iter()) {
            assert_eq!(v[1], 0.0);
            assert_eq!(*n, [0.0, 1.0, 0.0]);
        }
    }
}
