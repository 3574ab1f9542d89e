use coffee_machine::{Coffee, CoffeeType, Command, Machine, Size, StockIngredients};
use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

/// Generates operator command sequences for benchmarking.
///
/// Cycles through every coffee type and size, and issues a `FillAll`
/// after every `refill_every` orders (0 = never refill).
pub struct CommandGenerator {
    remaining: usize,
    refill_every: usize,
    orders_since_refill: usize,
    step: usize,
}

impl CommandGenerator {
    pub fn new(count: usize, refill_every: usize) -> Self {
        Self {
            remaining: count,
            refill_every,
            orders_since_refill: 0,
            step: 0,
        }
    }
}

impl Iterator for CommandGenerator {
    type Item = Command;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;

        if self.refill_every > 0 && self.orders_since_refill >= self.refill_every {
            self.orders_since_refill = 0;
            return Some(Command::FillAll);
        }

        let coffee = CoffeeType::ALL[self.step % CoffeeType::ALL.len()];
        let size = Size::ALL[(self.step / CoffeeType::ALL.len()) % Size::ALL.len()];
        self.step += 1;
        self.orders_since_refill += 1;

        Some(Command::Order {
            coffee: coffee.as_str().to_string(),
            size: size.as_str().to_string(),
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for CommandGenerator {}

fn bench_resolve(c: &mut Criterion) {
    c.bench_function("resolve_all_combinations", |b| {
        b.iter(|| {
            for coffee in ["espresso", "latte", "cappuccino"] {
                for size in ["small", "medium", "large"] {
                    let _ = black_box(Coffee::resolve(coffee, size));
                }
            }
        });
    });
}

fn bench_check_availability(c: &mut Criterion) {
    let stock = StockIngredients::with_cups();
    let coffee = Coffee::new(CoffeeType::Latte, Size::Large);

    c.bench_function("check_availability", |b| {
        b.iter(|| black_box(stock.check_availability(black_box(coffee.ingredients()))));
    });
}

fn bench_orders(c: &mut Criterion) {
    let mut group = c.benchmark_group("orders");

    // Stock runs out after a handful of orders; the rest are rejections
    for count in [1_000usize, 10_000, 100_000] {
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, &count| {
            b.iter(|| {
                let mut machine = Machine::default();
                for command in CommandGenerator::new(count, 0) {
                    let _ = black_box(machine.apply(command));
                }
                machine
            });
        });
    }

    group.finish();
}

fn bench_orders_with_refills(c: &mut Criterion) {
    let mut group = c.benchmark_group("orders_with_refills");

    for refill_every in [1usize, 5, 10] {
        group.bench_with_input(
            BenchmarkId::from_parameter(refill_every),
            &refill_every,
            |b, &refill_every| {
                b.iter(|| {
                    let mut machine = Machine::default();
                    for command in CommandGenerator::new(10_000, refill_every) {
                        let _ = black_box(machine.apply(command));
                    }
                    machine
                });
            },
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_resolve,
    bench_check_availability,
    bench_orders,
    bench_orders_with_refills,
);

criterion_main!(benches);
