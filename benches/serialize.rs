#![allow(missing_docs)]

use composer::{Attributes, Element, Map, MapBuilder, RuleSet, SerializeError, Serializer, Value};
use criterion::{Criterion, criterion_group, criterion_main};

/// Build a catalog-style detail tree with `items` entries, each holding a
/// small nested dimensions mapping.
fn catalog(items: usize) -> Value {
    let mut details = Map::new();
    let mut builder = MapBuilder::new(&mut details);
    for index in 0..items {
        builder
            .nested(&format!("item{index:03}"), |item| {
                item.set("name", format!("Item {index}"))?;
                item.set("quantity", 4)?;
                item.nested("dimensions", |dimensions| {
                    dimensions.set("length", 12.5)?;
                    dimensions.set("width", 3.25)?;
                    Ok(())
                })?;
                Ok(())
            })
            .unwrap();
    }
    Value::Map(details)
}

/// A resume-only rule at the root plus one deep leaf override, so the
/// benchmark exercises both the rule lookup and the default path.
fn rules() -> RuleSet {
    RuleSet::builder()
        .at(
            &"catalog".parse().unwrap(),
            |_key, _value, target, _path, proceed| {
                proceed.resume(target)?;
                Ok(())
            },
        )
        .at(
            &"catalog.item000.dimensions".parse().unwrap(),
            |_key, value, target, at, _proceed| {
                let dimensions = value
                    .as_map()
                    .ok_or_else(|| SerializeError::transform(at, "expected a mapping"))?;
                let length = dimensions
                    .get("length")
                    .and_then(Value::as_scalar)
                    .ok_or_else(|| SerializeError::transform(at, "missing length"))?;
                target.leaf_with(
                    "Dimensions".parse().unwrap(),
                    length.clone(),
                    Attributes::new().with("unitOfMeasure", "IN"),
                );
                Ok(())
            },
        )
        .build()
}

fn serialize_catalog(c: &mut Criterion) {
    let serializer = Serializer::new(rules());
    let data = catalog(100);

    c.bench_function("serialize catalog", |b| {
        use criterion::BatchSize;

        b.iter_batched(
            || Element::new("Feed".parse().unwrap()),
            |mut target| {
                serializer
                    .serialize("catalog", &data, &mut target)
                    .unwrap();
                target
            },
            BatchSize::SmallInput,
        );
    });
}

criterion_group!(benches, serialize_catalog);
criterion_main!(benches);
