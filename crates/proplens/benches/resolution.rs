use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use proplens::{case, AccessProxy, Introspect, ProxyOptions, Record, Registry, ResolveOptions};

#[derive(Introspect)]
#[introspect(getters(get_full_name))]
pub struct Customer {
    pub first_name: String,
    pub last_name: String,
    pub postal_code: String,
    pub loyalty_points: i64,
}

impl Customer {
    fn new() -> Self {
        Self {
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            postal_code: "1010".to_string(),
            loyalty_points: 42,
        }
    }

    pub fn get_full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

fn registry() -> Registry {
    let registry = Registry::with_defaults();
    registry.register_type::<Customer>();
    registry
}

fn bench_case(c: &mut Criterion) {
    let mut group = c.benchmark_group("case");

    for input in ["postal_code", "PostalCode", "some long-ish identifier+with parts"] {
        group.bench_with_input(BenchmarkId::new("camel", input), &input, |b, input| {
            b.iter(|| case::to_camel(black_box(input)));
        });
    }

    group.finish();
}

fn bench_getter_map(c: &mut Criterion) {
    let registry = registry();
    let customer = Customer::new();
    let record = Record::from_iter([("first_name", "Ada"), ("last_name", "Lovelace")]);

    c.bench_function("getter_map_object_cached", |b| {
        b.iter(|| registry.getters_of(black_box(&customer)).unwrap());
    });

    c.bench_function("getter_map_object_restricted", |b| {
        let opts = ResolveOptions::new().with_props(["postal_code", "fullName"]);
        b.iter(|| registry.getter_map(black_box(&customer), &opts).unwrap());
    });

    c.bench_function("getter_map_record", |b| {
        b.iter(|| registry.getters_of(black_box(&record)).unwrap());
    });
}

fn bench_proxy(c: &mut Criterion) {
    let registry = registry();
    let customer = Customer::new();

    c.bench_function("proxy_get", |b| {
        let proxy = AccessProxy::new(&registry, &customer, &ProxyOptions::default()).unwrap();
        b.iter(|| proxy.get(black_box("fullName")).unwrap());
    });

    c.bench_function("proxy_to_array", |b| {
        let proxy = AccessProxy::new(&registry, &customer, &ProxyOptions::default()).unwrap();
        b.iter(|| proxy.to_array().unwrap());
    });
}

criterion_group!(benches, bench_case, bench_getter_map, bench_proxy);
criterion_main!(benches);
