use criterion::{criterion_group, criterion_main, Criterion};
use resilient_json::decode::{decode, DecodeCallbacks};
use resilient_json::encode::EncodeContext;
use resilient_json::error::JsonError;

struct NoopCallbacks;

impl DecodeCallbacks for NoopCallbacks {
    fn on_begin_array(&mut self, _name: Option<&str>) -> Result<(), JsonError> {
        Ok(())
    }
    fn on_begin_object(&mut self, _name: Option<&str>) -> Result<(), JsonError> {
        Ok(())
    }
    fn on_end_container(&mut self) -> Result<(), JsonError> {
        Ok(())
    }
    fn on_bool(&mut self, _name: Option<&str>, _value: bool) -> Result<(), JsonError> {
        Ok(())
    }
    fn on_i64(&mut self, _name: Option<&str>, _value: i64) -> Result<(), JsonError> {
        Ok(())
    }
    fn on_u64(&mut self, _name: Option<&str>, _value: u64) -> Result<(), JsonError> {
        Ok(())
    }
    fn on_f64(&mut self, _name: Option<&str>, _value: f64) -> Result<(), JsonError> {
        Ok(())
    }
    fn on_null(&mut self, _name: Option<&str>) -> Result<(), JsonError> {
        Ok(())
    }
    fn on_string(&mut self, _name: Option<&str>, _value: &str) -> Result<(), JsonError> {
        Ok(())
    }
}

fn build_document(entries: usize) -> Vec<u8> {
    let mut ctx: EncodeContext<Vec<u8>> = EncodeContext::new(false, Vec::new());
    ctx.begin_object(None).unwrap();
    for i in 0..entries {
        let key = i.to_string();
        ctx.begin_object(Some(&key)).unwrap();
        ctx.add_i64(Some("id"), i as i64).unwrap();
        ctx.add_str(Some("name"), Some("hello, world!")).unwrap();
        ctx.add_f64(Some("score"), 3.14159).unwrap();
        ctx.add_bool(Some("active"), i % 2 == 0).unwrap();
        ctx.add_null(Some("parent")).unwrap();
        ctx.end_container().unwrap();
    }
    ctx.end_container().unwrap();
    ctx.finish().unwrap()
}

fn decode_document(json: &[u8], scratch: &mut [u8]) {
    let mut callbacks = NoopCallbacks;
    decode(json, scratch, &mut callbacks).unwrap();
}

fn codec_benchmark(c: &mut Criterion) {
    let small = build_document(16);
    let large = build_document(10_000);
    let mut scratch = vec![0u8; 512];

    c.bench_function("encode_small", |b| {
        b.iter(|| build_document(16));
    });

    c.bench_function("encode_large", |b| {
        b.iter(|| build_document(10_000));
    });

    c.bench_function("decode_small", |b| {
        b.iter(|| decode_document(&small, &mut scratch));
    });

    c.bench_function("decode_large", |b| {
        b.iter(|| decode_document(&large, &mut scratch));
    });
}

criterion_group!(benches, codec_benchmark);
criterion_main!(benches);
