#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

use quadfund_ledger::{quadratic_cost, Registry};
use quadfund_types::{Address, Amount, ProposalId, VoterId};

#[derive(Arbitrary, Debug)]
enum Op {
    Allocate { voter: u8, proposal: u8, votes: u64 },
    TopUp { voter: u8, amount: u64 },
}

#[derive(Arbitrary, Debug)]
struct Input {
    budgets: Vec<u32>,
    proposals: u8,
    ops: Vec<Op>,
}

// Arbitrary allocate/top-up sequences must never push a voter past their
// budget, and the reported tallies must match the voters' own maps.
fuzz_target!(|input: Input| {
    let mut reg = Registry::new();
    let Ok(creator) = Address::new("0xfuzz") else {
        return;
    };

    let voters: Vec<VoterId> = input
        .budgets
        .iter()
        .take(16)
        .enumerate()
        .map(|(i, credits)| {
            let id = VoterId::new(format!("v{i}"));
            let _ = reg.register_voter(id.clone(), Some(u128::from(*credits)));
            id
        })
        .collect();
    let proposals: Vec<ProposalId> = (0..input.proposals % 8 + 1)
        .filter_map(|i| {
            reg.create_proposal(&format!("p{i}"), None, Amount::ZERO, creator.clone())
                .ok()
                .map(|p| p.id.clone())
        })
        .collect();
    if voters.is_empty() {
        return;
    }

    for op in input.ops.iter().take(256) {
        match *op {
            Op::Allocate { voter, proposal, votes } => {
                let v = &voters[voter as usize % voters.len()];
                let p = &proposals[proposal as usize % proposals.len()];
                let _ = reg.allocate(v, p, votes);
            }
            Op::TopUp { voter, amount } => {
                let v = &voters[voter as usize % voters.len()];
                let _ = reg.add_credits(v, u128::from(amount));
            }
        }
    }

    for v in reg.voters() {
        assert!(v.credits_used() <= v.credits);
    }
    for p in &proposals {
        let detail = reg.proposal_detail(p).expect("proposal exists");
        let scanned: u128 = reg.voters().map(|v| u128::from(v.allocation(p))).sum();
        assert_eq!(detail.summary.total_votes, scanned);
        for c in &detail.contributors {
            assert_eq!(c.credits_cost, quadratic_cost(c.votes));
        }
    }
});
