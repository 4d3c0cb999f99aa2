use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use newt_msg::*;
use tinyvec::ArrayVec;

#[derive(Debug)]
struct TestInput {
  tkl: u8,
  n_opts: u16,
  opt_size: usize,
  payload_size: usize,
}

impl TestInput {
  fn message(&self) -> Message {
    let token = core::iter::repeat(1u8).take(self.tkl as _).collect::<Vec<_>>();
    let mut msg = Message::new(Type::Non,
                               Code::CONTENT,
                               Id(1),
                               Token::try_from_slice(&token).unwrap());

    (0..self.n_opts).for_each(|n| msg.add(OptNumber(n), OptValue(vec![1; self.opt_size])));
    msg.payload = Payload(vec![1; self.payload_size]);
    msg
  }

  fn bytes(&self) -> Vec<u8> {
    self.message().try_into_bytes().unwrap()
  }
}

fn inputs() -> Vec<TestInput> {
  vec![TestInput { tkl: 0,
                   n_opts: 0,
                   opt_size: 0,
                   payload_size: 0 },
       TestInput { tkl: 4,
                   n_opts: 4,
                   opt_size: 16,
                   payload_size: 40 },
       TestInput { tkl: 8,
                   n_opts: 16,
                   opt_size: 64,
                   payload_size: 128 },
       TestInput { tkl: 8,
                   n_opts: 8,
                   opt_size: 64,
                   payload_size: 1024 },]
}

fn message_to_bytes(c: &mut Criterion) {
  let mut group = c.benchmark_group("msg/to_bytes");

  for inp in inputs().iter() {
    let size = inp.bytes().len();

    group.bench_with_input(BenchmarkId::new("newt_msg/vec/size", size), inp, |b, inp| {
           b.iter_batched(|| inp.message(),
                          |m| m.try_into_bytes::<Vec<_>>().unwrap(),
                          BatchSize::SmallInput)
         });

    group.bench_with_input(BenchmarkId::new("newt_msg/array_vec/size", size),
                           inp,
                           |b, inp| {
                             b.iter_batched(|| inp.message(),
                                            |m| m.try_into_bytes::<ArrayVec<[u8; 4096]>>(),
                                            BatchSize::SmallInput)
                           });

    let cl_packet = coap_lite::Packet::from_bytes(&inp.bytes()).unwrap();
    group.bench_with_input(BenchmarkId::new("coap_lite/size", size),
                           &cl_packet,
                           |b, inp| b.iter(|| inp.to_bytes()));
  }
  group.finish();
}

fn message_from_bytes(c: &mut Criterion) {
  let mut group = c.benchmark_group("msg/from_bytes");

  for inp in inputs().iter() {
    let bytes = inp.bytes();

    group.bench_with_input(BenchmarkId::new("newt_msg/owned/size", bytes.len()),
                           &bytes,
                           |b, bytes| b.iter(|| Message::try_from_bytes(bytes)));

    group.bench_with_input(BenchmarkId::new("newt_msg/raw/size", bytes.len()),
                           &bytes,
                           |b, bytes| b.iter(|| RawMessage::try_from_bytes(bytes.as_slice())));

    group.bench_with_input(BenchmarkId::new("coap_lite/size", bytes.len()),
                           &bytes,
                           |b, bytes| b.iter(|| coap_lite::Packet::from_bytes(bytes)));
  }
  group.finish();
}

criterion_group!(benches, message_to_bytes, message_from_bytes);
criterion_main!(benches);
