//! Integration tests for structured buffer packing.

use gpukit::layout::{
    CompositeKind, DataType, EntryData, LayoutError, ScalarType, StructAlignmentMode,
    StructuredBuffer,
};
use half::f16;

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn read_u32(bytes: &[u8], offset: usize) -> u32 {
    u32::from_ne_bytes(bytes[offset..offset + 4].try_into().unwrap())
}

fn read_i32(bytes: &[u8], offset: usize) -> i32 {
    i32::from_ne_bytes(bytes[offset..offset + 4].try_into().unwrap())
}

fn read_f32(bytes: &[u8], offset: usize) -> f32 {
    f32::from_ne_bytes(bytes[offset..offset + 4].try_into().unwrap())
}

/// Sample data of the right lane type and count for `data_type`.
fn sample_data(data_type: DataType) -> EntryData {
    let lanes = match data_type.kind {
        CompositeKind::Scalar => 1,
        CompositeKind::Vec2 => 2,
        CompositeKind::Vec3 => 3,
        CompositeKind::Vec4 | CompositeKind::Array => 4,
        CompositeKind::Mat3x3 => 12,
        CompositeKind::Mat4x4 => 16,
    };

    if data_type.kind == CompositeKind::Scalar {
        return match data_type.scalar {
            ScalarType::Bool => true.into(),
            ScalarType::Int32 => (-7i32).into(),
            ScalarType::Uint32 => 7u32.into(),
            ScalarType::Uint16 => 7u16.into(),
            ScalarType::Float32 => 0.5f32.into(),
            ScalarType::Float16 => f16::from_f32(0.5).into(),
        };
    }

    match data_type.scalar {
        ScalarType::Bool => vec![true; lanes].into(),
        ScalarType::Int32 => vec![-1i32; lanes].into(),
        ScalarType::Uint32 => vec![1u32; lanes].into(),
        ScalarType::Uint16 => vec![1u16; lanes].into(),
        ScalarType::Float32 => vec![1.0f32; lanes].into(),
        ScalarType::Float16 => vec![f16::ONE; lanes].into(),
    }
}

// ==================== Alignment Rules ====================

#[test]
fn test_scalar_align_equals_size() {
    for scalar in ScalarType::all() {
        let mut buffer = StructuredBuffer::new();
        let data_type = DataType::scalar(*scalar);
        buffer.set_entry("x", sample_data(data_type), data_type).unwrap();

        let entry = buffer.get("x").unwrap();
        let expected = scalar.align_and_size().size;
        assert_eq!(entry.align(), expected, "{:?}", scalar);
        assert_eq!(entry.size(), expected, "{:?}", scalar);
    }
}

#[test]
fn test_vec3_is_four_lanes_aligned() {
    for scalar in ScalarType::all() {
        let mut buffer = StructuredBuffer::new();
        let data_type = DataType::vec3(*scalar);
        buffer.set_entry("v", sample_data(data_type), data_type).unwrap();

        let base = scalar.align_and_size();
        let entry = buffer.get("v").unwrap();
        assert_eq!(entry.align(), base.align * 4, "{:?}", scalar);
        assert_eq!(entry.size(), base.size * 3, "{:?}", scalar);
    }
}

#[test]
fn test_mat4x4_sizes() {
    let mut buffer = StructuredBuffer::new();
    let f32_mat = DataType::mat4x4(ScalarType::Float32);
    let f16_mat = DataType::mat4x4(ScalarType::Float16);
    buffer.set_entry("m32", sample_data(f32_mat), f32_mat).unwrap();
    buffer.set_entry("m16", sample_data(f16_mat), f16_mat).unwrap();

    let m32 = buffer.get("m32").unwrap();
    assert_eq!((m32.align(), m32.size()), (16, 64));
    let m16 = buffer.get("m16").unwrap();
    assert_eq!((m16.align(), m16.size()), (8, 32));
}

#[test]
fn test_array_of_five_floats() {
    let mut buffer = StructuredBuffer::new();
    buffer
        .set_entry("a", vec![1.0f32, 2.0, 3.0, 4.0, 5.0], DataType::array(ScalarType::Float32))
        .unwrap();

    let entry = buffer.get("a").unwrap();
    assert_eq!((entry.align(), entry.size()), (4, 20));
    assert_eq!(buffer.byte_size(), 20);
}

#[test]
fn test_matrix_rejects_non_float_elements() {
    init_logger();

    for scalar in [ScalarType::Bool, ScalarType::Int32, ScalarType::Uint32, ScalarType::Uint16] {
        for data_type in [DataType::mat3x3(scalar), DataType::mat4x4(scalar)] {
            let mut buffer = StructuredBuffer::new();
            let err = buffer
                .set_entry("m", sample_data(data_type), data_type)
                .unwrap_err();
            assert!(
                matches!(err, LayoutError::InvalidElementType { .. }),
                "{} gave {:?}",
                data_type,
                err
            );
            assert!(buffer.is_empty());
        }
    }
}

#[test]
fn test_array_requires_sequence_data() {
    init_logger();

    let mut buffer = StructuredBuffer::new();
    let err = buffer
        .set_entry("a", 3.0f32, DataType::array(ScalarType::Float32))
        .unwrap_err();
    assert!(matches!(err, LayoutError::InvalidDataType { .. }));
    assert!(err.to_string().contains("array<f32>"));
    assert!(buffer.is_empty());
}

// ==================== Packing ====================

#[test]
fn test_scalar_then_vec3_layout() {
    let mut buffer = StructuredBuffer::new();
    buffer.set_entry("A", 1.5f32, DataType::scalar(ScalarType::Float32)).unwrap();
    buffer
        .set_entry("B", [1.0f32, 2.0, 3.0], DataType::vec3(ScalarType::Float32))
        .unwrap();

    let layout = buffer.layout();
    assert_eq!(layout[0].offset, 0);
    assert_eq!(layout[0].size + layout[0].padding, 16);
    assert_eq!(layout[1].offset, 16);

    let bytes = buffer.pack();
    assert_eq!(bytes.len(), 32);
    assert_eq!(read_f32(&bytes, 0), 1.5);
    assert!(bytes[4..16].iter().all(|&b| b == 0));
    assert_eq!(read_f32(&bytes, 16), 1.0);
    assert_eq!(read_f32(&bytes, 20), 2.0);
    assert_eq!(read_f32(&bytes, 24), 3.0);
}

#[test]
fn test_single_bool_packs_as_u32() {
    let mut buffer = StructuredBuffer::new();
    buffer.set_entry("bool", true, DataType::scalar(ScalarType::Bool)).unwrap();

    let bytes = buffer.pack();
    assert_eq!(bytes.len(), 4);
    assert_eq!(read_u32(&bytes, 0), 1);
}

#[test]
fn test_single_scalar_sizes() {
    let cases: [(DataType, EntryData, usize); 4] = [
        (DataType::scalar(ScalarType::Bool), true.into(), 4),
        (DataType::scalar(ScalarType::Int32), (-42i32).into(), 4),
        (DataType::scalar(ScalarType::Uint32), 42u32.into(), 4),
        (DataType::scalar(ScalarType::Float32), 1234.5678f32.into(), 4),
    ];

    for (data_type, data, expected) in cases {
        let mut buffer = StructuredBuffer::new();
        buffer.set_entry("x", data, data_type).unwrap();
        assert_eq!(buffer.pack().len(), expected, "{}", data_type);
    }
}

#[test]
fn test_pack_is_idempotent() {
    let mut buffer = StructuredBuffer::new();
    buffer.set_entry("t", 0.25f32, DataType::scalar(ScalarType::Float32)).unwrap();
    buffer
        .set_entry("m", [[1.0f32, 0.0, 0.0, 0.0]; 4], DataType::mat4x4(ScalarType::Float32))
        .unwrap();
    buffer.set_entry("n", -3i32, DataType::scalar(ScalarType::Int32)).unwrap();

    assert_eq!(buffer.pack(), buffer.pack());
}

#[test]
fn test_pack_length_matches_byte_size() {
    let mut buffer = StructuredBuffer::new();
    for (i, scalar) in ScalarType::all().iter().enumerate() {
        for kind in [
            CompositeKind::Scalar,
            CompositeKind::Vec2,
            CompositeKind::Vec3,
            CompositeKind::Vec4,
            CompositeKind::Array,
        ] {
            let data_type = DataType::new(*scalar, kind);
            buffer
                .set_entry(format!("{}_{:?}", i, kind), sample_data(data_type), data_type)
                .unwrap();
            assert_eq!(buffer.pack().len(), buffer.byte_size());
        }
    }
}

#[test]
fn test_replacing_data_keeps_offsets() {
    let mut buffer = StructuredBuffer::new();
    buffer.set_entry("a", 1i32, DataType::scalar(ScalarType::Int32)).unwrap();
    buffer
        .set_entry("b", [1.0f32, 2.0, 3.0, 4.0], DataType::vec4(ScalarType::Float32))
        .unwrap();
    buffer.set_entry("c", 9u32, DataType::scalar(ScalarType::Uint32)).unwrap();

    let before = buffer.pack();
    let layout_before = buffer.layout();

    buffer
        .set_entry("b", [5.0f32, 6.0, 7.0, 8.0], DataType::vec4(ScalarType::Float32))
        .unwrap();
    let after = buffer.pack();

    assert_eq!(before.len(), after.len());
    assert_eq!(layout_before, buffer.layout());
    assert_eq!(before[..16], after[..16]);
    assert_ne!(before[16..32], after[16..32]);
    assert_eq!(before[32..], after[32..]);
    assert_eq!(read_i32(&after, 0), 1);
    assert_eq!(read_f32(&after, 16), 5.0);
    assert_eq!(read_u32(&after, 32), 9);
}

#[test]
fn test_insertion_order_is_layout_order() {
    let mut buffer = StructuredBuffer::new();
    for name in ["zeta", "alpha", "mid"] {
        buffer.set_entry(name, 1.0f32, DataType::scalar(ScalarType::Float32)).unwrap();
    }
    buffer.set_entry("alpha", 2.0f32, DataType::scalar(ScalarType::Float32)).unwrap();

    let names: Vec<String> = buffer.layout().into_iter().map(|l| l.name).collect();
    assert_eq!(names, vec!["zeta", "alpha", "mid"]);

    let bytes = buffer.pack();
    assert_eq!(read_f32(&bytes, 4), 2.0);
}

#[test]
fn test_mat3x3_column_padding() {
    let mut buffer = StructuredBuffer::new();
    let tight: [[f32; 3]; 3] = [[1.0, 2.0, 3.0], [4.0, 5.0, 6.0], [7.0, 8.0, 9.0]];
    buffer.set_entry("m", tight, DataType::mat3x3(ScalarType::Float32)).unwrap();

    let bytes = buffer.pack();
    assert_eq!(bytes.len(), 48);
    let lanes: Vec<f32> = (0..12).map(|i| read_f32(&bytes, i * 4)).collect();
    assert_eq!(
        lanes,
        vec![1.0, 2.0, 3.0, 0.0, 4.0, 5.0, 6.0, 0.0, 7.0, 8.0, 9.0, 0.0]
    );

    let mut padded = StructuredBuffer::new();
    padded
        .set_entry("m", lanes, DataType::mat3x3(ScalarType::Float32))
        .unwrap();
    assert_eq!(padded.pack(), bytes);
}

#[test]
fn test_f16_entries() {
    let mut buffer = StructuredBuffer::new();
    buffer
        .set_entry("h", f16::from_f32(0.5), DataType::scalar(ScalarType::Float16))
        .unwrap();
    buffer
        .set_entry("v", vec![f16::ONE; 3], DataType::vec3(ScalarType::Float16))
        .unwrap();

    // Struct alignment is 8 (vec3<f16>), so `h` pads to 8 and `v` (6 bytes) to 16.
    assert_eq!(buffer.struct_alignment(), 8);
    let bytes = buffer.pack();
    assert_eq!(bytes.len(), 16);
    assert_eq!(
        u16::from_ne_bytes([bytes[0], bytes[1]]),
        f16::from_f32(0.5).to_bits()
    );
    assert_eq!(u16::from_ne_bytes([bytes[8], bytes[9]]), f16::ONE.to_bits());
}

// ==================== Struct Alignment Policy ====================

#[test]
fn test_struct_alignment_modes_after_replacement() {
    let build = |mode| {
        let mut buffer = StructuredBuffer::with_mode(mode);
        buffer.set_entry("a", 1.0f32, DataType::scalar(ScalarType::Float32)).unwrap();
        buffer
            .set_entry("b", [0.0f32; 4], DataType::vec4(ScalarType::Float32))
            .unwrap();
        buffer.set_entry("b", 2.0f32, DataType::scalar(ScalarType::Float32)).unwrap();
        buffer
    };

    let monotonic = build(StructAlignmentMode::Monotonic);
    assert_eq!(monotonic.struct_alignment(), 16);
    assert_eq!(monotonic.pack().len(), 32);

    let current = build(StructAlignmentMode::Current);
    assert_eq!(current.struct_alignment(), 4);
    assert_eq!(current.pack().len(), 8);
}

#[test]
fn test_struct_alignment_mode_from_json() {
    let mode: StructAlignmentMode = serde_json::from_str("\"current\"").unwrap();
    assert_eq!(mode, StructAlignmentMode::Current);
    assert_eq!(StructAlignmentMode::default(), StructAlignmentMode::Monotonic);
    assert_eq!(
        serde_json::to_string(&StructAlignmentMode::Monotonic).unwrap(),
        "\"monotonic\""
    );
}

#[test]
fn test_layout_serializes_to_json() {
    let mut buffer = StructuredBuffer::new();
    buffer.set_entry("time", 1.0f32, DataType::scalar(ScalarType::Float32)).unwrap();

    let json = serde_json::to_value(buffer.layout()).unwrap();
    assert_eq!(json[0]["name"], "time");
    assert_eq!(json[0]["offset"], 0);
    assert_eq!(json[0]["data_type"]["scalar"], "Float32");
    assert_eq!(json[0]["data_type"]["kind"], "Scalar");
}
