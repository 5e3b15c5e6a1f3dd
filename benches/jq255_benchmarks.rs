use criterion::{criterion_group, criterion_main, Criterion};
use jq255::{jq255e, jq255s, HashVariant};
use rand::{rngs::OsRng, RngCore};

fn random_seed() -> [u8; 32] {
    let mut seed = [0u8; 32];
    OsRng.fill_bytes(&mut seed);
    seed
}

fn bench_jq255e(c: &mut Criterion) {
    let mut group = c.benchmark_group("jq255e");

    group.bench_function("generate_keypair", |b| {
        b.iter(|| std::hint::black_box(jq255e::generate_keypair(&random_seed())));
    });

    let kp = jq255e::generate_keypair(&random_seed());
    let pub_enc = jq255e::encode_public_key(&kp.public);

    group.bench_function("decode_public_key", |b| {
        b.iter(|| std::hint::black_box(jq255e::decode_public_key(&pub_enc)));
    });

    group.bench_function("sign", |b| {
        b.iter(|| std::hint::black_box(jq255e::sign(&kp, HashVariant::Raw, b"benchmark message")));
    });

    let sig = jq255e::sign(&kp, HashVariant::Raw, b"benchmark message");
    group.bench_function("verify", |b| {
        b.iter(|| {
            std::hint::black_box(jq255e::verify(&sig, &kp.public, HashVariant::Raw, b"benchmark message"))
        });
    });

    let peer = jq255e::generate_keypair(&random_seed());
    group.bench_function("ecdh", |b| {
        b.iter(|| std::hint::black_box(jq255e::ecdh(&kp, &peer.public)));
    });

    group.finish();
}

fn bench_jq255s(c: &mut Criterion) {
    let mut group = c.benchmark_group("jq255s");

    group.bench_function("generate_keypair", |b| {
        b.iter(|| std::hint::black_box(jq255s::generate_keypair(&random_seed())));
    });

    let kp = jq255s::generate_keypair(&random_seed());
    let pub_enc = jq255s::encode_public_key(&kp.public);

    group.bench_function("decode_public_key", |b| {
        b.iter(|| std::hint::black_box(jq255s::decode_public_key(&pub_enc)));
    });

    group.bench_function("sign", |b| {
        b.iter(|| std::hint::black_box(jq255s::sign(&kp, HashVariant::Raw, b"benchmark message")));
    });

    let sig = jq255s::sign(&kp, HashVariant::Raw, b"benchmark message");
    group.bench_function("verify", |b| {
        b.iter(|| {
            std::hint::black_box(jq255s::verify(&sig, &kp.public, HashVariant::Raw, b"benchmark message"))
        });
    });

    let peer = jq255s::generate_keypair(&random_seed());
    group.bench_function("ecdh", |b| {
        b.iter(|| std::hint::black_box(jq255s::ecdh(&kp, &peer.public)));
    });

    group.finish();
}

criterion_group!(benches, bench_jq255e, bench_jq255s);
criterion_main!(benches);
