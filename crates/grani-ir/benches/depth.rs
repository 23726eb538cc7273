//! Depth computation benchmark on layered circuits.

use criterion::{Criterion, criterion_group, criterion_main};

use grani_ir::{Circuit, QubitId};

fn layered_circuit(qubits: u32, layers: u32) -> Circuit {
    let mut circuit = Circuit::with_size("layered", qubits, 0);
    for layer in 0..layers {
        let offset = layer % 2;
        let mut q = offset;
        while q + 1 < qubits {
            circuit.cx(QubitId(q), QubitId(q + 1)).unwrap();
            q += 2;
        }
        for q in 0..qubits {
            circuit.rz(0.25, QubitId(q)).unwrap();
        }
    }
    circuit
}

fn bench_depth(c: &mut Criterion) {
    let circuit = layered_circuit(20, 50);
    let dag = circuit.into_dag();

    c.bench_function("depth_full", |b| b.iter(|| dag.depth()));
    c.bench_function("depth_two_qubit", |b| b.iter(|| dag.two_qubit_depth()));
}

criterion_group!(benches, bench_depth);
criterion_main!(benches);
