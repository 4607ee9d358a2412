//! Integration tests for the entity set differ

use chunkwatch_engine::{DiffConfig, EntitySetDiffer};
use chunkwatch_storage::{EntityBuilder, Query};

use crate::common::scene;

#[test]
fn component_removal_moves_between_queries() {
    let mut s = scene();
    let x = s.hp;
    let a = s.world.spawn_with(EntityBuilder::new().with(x, 1)).unwrap();
    let b = s.world.spawn_with(EntityBuilder::new().with(x, 2)).unwrap();

    let with_x = Query::new().with(x);
    let without_x = Query::new().without(x);
    let mut has = EntitySetDiffer::new();
    let mut lacks = EntitySetDiffer::new();

    let first = has.diff(&s.world, &with_x);
    assert_eq!(first.created, vec![a, b]);
    assert!(lacks.diff(&s.world, &without_x).is_empty());

    s.world.remove(a, x).unwrap();

    let second = has.diff(&s.world, &with_x);
    assert!(second.created.is_empty());
    assert_eq!(second.destroyed, vec![a]);

    let complement = lacks.diff(&s.world, &without_x);
    assert_eq!(complement.created, vec![a]);
    assert!(complement.destroyed.is_empty());
}

#[test]
fn index_reuse_is_destroy_plus_create() {
    let mut s = scene();
    let query = Query::new().with(s.hp);
    let old = s.spawn(1, 0);
    let mut differ = EntitySetDiffer::new();
    differ.diff(&s.world, &query);

    s.world.destroy(old).unwrap();
    let new = s.spawn(1, 0);
    assert_eq!(old.index, new.index);

    let changes = differ.diff(&s.world, &query);
    assert_eq!(changes.destroyed, vec![old]);
    assert_eq!(changes.created, vec![new]);
}

#[test]
fn growth_alone_is_not_a_change() {
    let mut s = scene();
    let query = Query::new().with(s.hp);
    s.spawn(1, 0);
    let mut differ = EntitySetDiffer::with_config(DiffConfig::default().with_skip_when_global_unchanged(false));
    differ.diff(&s.world, &query);

    // Grow the index space with entities the query does not see.
    for _ in 0..100 {
        s.world.spawn().unwrap();
    }
    assert!(differ.diff(&s.world, &query).is_empty());
}

#[test]
fn batches_union_to_whole_query() {
    let mut s = scene();
    let query = Query::new().with(s.hp);
    for i in 0..20 {
        s.spawn(i, (i % 3) as u16);
    }

    let mut whole = EntitySetDiffer::new();
    let mut expected = whole.diff(&s.world, &query);

    let mut fed = EntitySetDiffer::new();
    let mut pass = fed.begin();
    for chunk in s.world.query_chunks(&query) {
        pass.feed(chunk.entities());
    }
    let mut actual = pass.finish();
    actual.created.sort_unstable();
    expected.created.sort_unstable();

    assert_eq!(actual, expected);
    assert_eq!(actual.created.len(), 20);
}
