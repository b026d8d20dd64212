use super::*;

fn sample_extents() -> Vec<RenderedExtent> {
    vec![
        RenderedExtent::new(-40, -60, 38, 55),
        RenderedExtent::new(-52, -58, 50, 57),
        RenderedExtent::new(-45, -64, 44, 49),
    ]
}

#[test]
fn union_covers_every_extent() {
    let extents = sample_extents();
    let canvas = resolve_canvas(&extents).unwrap();
    assert_eq!(canvas.origin_x, -52);
    assert_eq!(canvas.origin_y, -64);
    assert_eq!(canvas.width, 102);
    assert_eq!(canvas.height, 121);

    for e in &extents {
        assert!(canvas.origin_x <= e.min_x && canvas.origin_y <= e.min_y);
        assert!(canvas.width >= e.width() && canvas.height >= e.height());
        assert!(canvas.origin_x + canvas.width as i32 >= e.max_x);
        assert!(canvas.origin_y + canvas.height as i32 >= e.max_y);
    }
}

#[test]
fn identical_extents_are_tight() {
    let e = RenderedExtent::new(3, 4, 13, 24);
    let canvas = resolve_canvas(&[e, e, e]).unwrap();
    assert_eq!(
        canvas,
        CanvasSpec {
            origin_x: 3,
            origin_y: 4,
            width: 10,
            height: 20,
        }
    );
}

#[test]
fn degenerate_extent_is_not_special_cased() {
    let canvas = resolve_canvas(&[
        RenderedExtent::new(0, 0, 0, 0),
        RenderedExtent::new(5, 5, 15, 25),
    ])
    .unwrap();
    assert_eq!((canvas.origin_x, canvas.origin_y), (0, 0));
    assert_eq!((canvas.width, canvas.height), (15, 25));
}

#[test]
fn empty_input_is_invalid() {
    let err = resolve_canvas(&[]).unwrap_err();
    assert!(matches!(err, BlockturnError::InvalidExtent(_)));
}

#[test]
fn malformed_extent_is_invalid() {
    let err = resolve_canvas(&[
        RenderedExtent::new(0, 0, 10, 10),
        RenderedExtent::new(0, 20, 10, 10),
    ])
    .unwrap_err();
    match err {
        BlockturnError::InvalidExtent(msg) => assert!(msg.contains("frame 1"), "{msg}"),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn all_empty_extents_are_invalid() {
    let e = RenderedExtent::new(7, 7, 7, 7);
    assert!(matches!(
        resolve_canvas(&[e, e]),
        Err(BlockturnError::InvalidExtent(_))
    ));
}
