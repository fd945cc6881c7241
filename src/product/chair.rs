//! The chair part catalog
//!
//! A fixed, ordered list of part descriptors. Cylinder arguments follow the
//! (top radius, bottom radius, height, radial segments) convention, boxes
//! are (width, height, depth).

use super::{PartDescriptor, ShapeKind};

pub const CHAIR_PARTS: &[PartDescriptor] = &[
    PartDescriptor {
        name: "seat",
        shape: ShapeKind::Box,
        shape_args: &[2.0, 0.2, 2.0],
        position: [0.0, 0.0, 0.0],
        color: 0x8b4513,
        title: "Chair Seat",
        description: "The main seating surface designed for comfort and durability. \
                      Made from solid oak wood with a smooth sanded finish.",
    },
    PartDescriptor {
        name: "backrest",
        shape: ShapeKind::Box,
        shape_args: &[2.0, 1.5, 0.2],
        position: [0.0, 0.85, -0.9],
        color: 0xa0522d,
        title: "Backrest",
        description: "Provides lumbar support and comfort for extended sitting. \
                      Features an ergonomic curve for optimal back support.",
    },
    PartDescriptor {
        name: "front-left-leg",
        shape: ShapeKind::Cylinder,
        shape_args: &[0.08, 0.08, 1.5, 16.0],
        position: [-0.8, -0.75, 0.8],
        color: 0x654321,
        title: "Front Left Leg",
        description: "Sturdy front left leg made from solid wood with anti-slip base \
                      and reinforced joints for stability.",
    },
    PartDescriptor {
        name: "front-right-leg",
        shape: ShapeKind::Cylinder,
        shape_args: &[0.08, 0.08, 1.5, 16.0],
        position: [0.8, -0.75, 0.8],
        color: 0x654321,
        title: "Front Right Leg",
        description: "Sturdy front right leg made from solid wood with anti-slip base \
                      and reinforced joints for stability.",
    },
    PartDescriptor {
        name: "back-left-leg",
        shape: ShapeKind::Cylinder,
        shape_args: &[0.08, 0.08, 2.5, 16.0],
        position: [-0.8, -0.25, -0.8],
        color: 0x654321,
        title: "Back Left Leg",
        description: "Extended back left leg supporting both the seat and backrest \
                      with reinforced construction for durability.",
    },
    PartDescriptor {
        name: "back-right-leg",
        shape: ShapeKind::Cylinder,
        shape_args: &[0.08, 0.08, 2.5, 16.0],
        position: [0.8, -0.25, -0.8],
        color: 0x654321,
        title: "Back Right Leg",
        description: "Extended back right leg supporting both the seat and backrest \
                      with reinforced construction for durability.",
    },
    PartDescriptor {
        name: "armrest-left",
        shape: ShapeKind::Box,
        shape_args: &[0.15, 0.1, 1.2],
        position: [-1.1, 0.3, -0.1],
        color: 0x8b4513,
        title: "Left Armrest",
        description: "Comfortable left armrest for relaxed arm positioning. \
                      Features a smooth surface and ergonomic height.",
    },
    PartDescriptor {
        name: "armrest-right",
        shape: ShapeKind::Box,
        shape_args: &[0.15, 0.1, 1.2],
        position: [1.1, 0.3, -0.1],
        color: 0x8b4513,
        title: "Right Armrest",
        description: "Comfortable right armrest for relaxed arm positioning. \
                      Features a smooth surface and ergonomic height.",
    },
];
