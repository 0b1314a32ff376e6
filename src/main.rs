use cutmap::lutmap::{lut_map, Params};
use cutmap::{GateKind, Lit, Mode, Netlist};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::process::ExitCode;

fn and(nl: &mut Netlist, a: Lit, b: Lit) -> Lit {
    let w = nl.add(GateKind::And);
    nl.set_fanin(w, 0, a);
    nl.set_fanin(w, 1, b);
    w
}

fn po(nl: &mut Netlist, v: Lit) {
    let w = nl.add(GateKind::PO);
    nl.set_fanin(w, 0, v);
}

// n PIs AND-ed together one at a time
fn build_chain(n: usize) -> Netlist {
    let mut nl = Netlist::new();
    nl.set_mode(Mode::Aig);
    let mut acc = nl.add(GateKind::PI);
    for _ in 1..n {
        let p = nl.add(GateKind::PI);
        acc = and(&mut nl, acc, p);
    }
    po(&mut nl, acc);
    nl
}

// balanced AND tree over 2^levels PIs
fn build_tree(levels: u32) -> Netlist {
    let mut nl = Netlist::new();
    nl.set_mode(Mode::Aig);
    let mut layer: Vec<Lit> = (0..1u32 << levels).map(|_| nl.add(GateKind::PI)).collect();
    while layer.len() > 1 {
        layer = layer
            .chunks(2)
            .map(|pair| and(&mut nl, pair[0], pair[1]))
            .collect();
    }
    po(&mut nl, layer[0]);
    nl
}

fn build_random(seed: u64, npi: usize, nands: usize, npo: usize) -> Netlist {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut nl = Netlist::new();
    nl.set_mode(Mode::Aig);
    let mut nodes: Vec<Lit> = (0..npi).map(|_| nl.add(GateKind::PI)).collect();
    for _ in 0..nands {
        let a = nodes[rng.gen_range(0..nodes.len())] ^ rng.gen_bool(0.5);
        let b = nodes[rng.gen_range(0..nodes.len())] ^ rng.gen_bool(0.5);
        nodes.push(and(&mut nl, a, b));
    }
    for _ in 0..npo {
        let v = nodes[rng.gen_range(0..nodes.len())] ^ rng.gen_bool(0.5);
        po(&mut nl, v);
    }
    nl
}

fn main() -> ExitCode {
    let mut bench = "random".to_string();
    let mut size: usize = 400;
    let mut npi: usize = 16;
    let mut seed: u64 = 1;
    let mut rounds: u32 = 4;
    let mut cuts_per_node: usize = 10;
    let mut delay_factor: f32 = 1.0;
    let mut map_for_area = false;
    let mut quiet = false;
    let mut verify = false;

    {
        let mut parser = argparse::ArgumentParser::new();
        parser.set_description("Map a benchmark AIG onto 6-input LUTs");
        parser.refer(&mut bench).add_option(
            &["--bench"],
            argparse::Store,
            "Benchmark to build: chain, tree or random",
        );
        parser.refer(&mut size).add_option(
            &["--size"],
            argparse::Store,
            "Chain length / tree levels / random AND count",
        );
        parser.refer(&mut npi).add_option(
            &["--inputs"],
            argparse::Store,
            "Primary input count of the random benchmark",
        );
        parser
            .refer(&mut seed)
            .add_option(&["--seed"], argparse::Store, "Random benchmark seed");
        parser
            .refer(&mut rounds)
            .add_option(&["--rounds"], argparse::Store, "Mapping rounds");
        parser.refer(&mut cuts_per_node).add_option(
            &["--cuts-per-node"],
            argparse::Store,
            "Priority cuts kept per node",
        );
        parser.refer(&mut delay_factor).add_option(
            &["--delay-factor"],
            argparse::Store,
            "Relaxation of the round-0 delay target (>= 1)",
        );
        parser.refer(&mut map_for_area).add_option(
            &["--map-for-area"],
            argparse::StoreTrue,
            "Admit all cuts on nodes outside the current mapping",
        );
        parser
            .refer(&mut quiet)
            .add_option(&["--quiet"], argparse::StoreTrue, "Suppress statistics");
        parser.refer(&mut verify).add_option(
            &["--verify"],
            argparse::StoreTrue,
            "Simulate the result against the input AIG",
        );
        parser.parse_args_or_exit();
    }

    let mut nl = match bench.as_str() {
        "chain" => build_chain(size),
        "tree" => {
            if size > 20 {
                eprintln!("tree benchmark takes the level count; {size} is too deep");
                return ExitCode::from(1);
            }
            build_tree(size as u32)
        }
        "random" => build_random(seed, npi, size, npi / 2),
        _ => {
            eprintln!("unknown benchmark: {bench}");
            return ExitCode::from(1);
        }
    };
    nl.compact();
    eprintln!(
        "Input: {} gates ({} PIs, {} POs, {} ANDs)",
        nl.count(),
        nl.kind_count(GateKind::PI),
        nl.kind_count(GateKind::PO),
        nl.kind_count(GateKind::And)
    );

    let gold = if verify { Some(nl.duplicate()) } else { None };

    let stats = lut_map(
        &mut nl,
        Params {
            n_rounds: rounds,
            cuts_per_node,
            delay_factor,
            map_for_area,
            quiet,
            refresh_cuts_after_round_0: true,
        },
    );

    eprintln!(
        "Mapped: {} LUT6, depth {}, {} cuts enumerated",
        stats.mapped_area, stats.mapped_delay, stats.cuts_enumerated
    );

    if let Some(gold) = gold {
        let n = gold.enum_size(GateKind::PI) as usize;
        let mut rng = StdRng::seed_from_u64(seed ^ 0x5eed);
        for trial in 0..1000 {
            let pi: Vec<bool> = (0..n).map(|_| rng.gen_bool(0.5)).collect();
            if gold.eval(&pi, &[]) != nl.eval(&pi, &[]) {
                eprintln!("MISMATCH on trial {trial}: {pi:?}");
                return ExitCode::from(1);
            }
        }
        eprintln!("Verified on 1000 random vectors");
    }

    ExitCode::SUCCESS
}
