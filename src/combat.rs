use rand::Rng;

/// Army losses from one round of dice combat.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttackOutcome {
    pub attacker_losses: u16,
    pub defender_losses: u16,
}

/// Dice the attacker may roll: one army must stay behind, cap of three.
pub fn attacker_dice(attacker_armies: u16, requested: u16) -> u16 {
    requested.min(attacker_armies.saturating_sub(1)).min(3)
}

/// Dice the defender rolls: every army defends, cap of two.
pub fn defender_dice(defender_armies: u16) -> u16 {
    defender_armies.min(2)
}

/// Sorts both sides' rolls descending and compares them pairwise,
/// highest against highest. The higher roll kills one army on the losing
/// side; ties go to the defender.
pub fn compare_rolls(attacker_rolls: &mut Vec<u16>, defender_rolls: &mut Vec<u16>) -> AttackOutcome {
    attacker_rolls.sort_unstable_by(|a, b| b.cmp(a));
    defender_rolls.sort_unstable_by(|a, b| b.cmp(a));

    let mut outcome = AttackOutcome {
        attacker_losses: 0,
        defender_losses: 0,
    };
    for (attack, defend) in attacker_rolls.iter().zip(defender_rolls.iter()) {
        if attack > defend {
            outcome.defender_losses += 1;
        } else {
            outcome.attacker_losses += 1;
        }
    }
    outcome
}

/// Resolves one round of combat. The only source of randomness in the
/// core; callers hand in the generator so tests can seed it.
pub fn resolve_attack<R: Rng>(
    attacker_armies: u16,
    defender_armies: u16,
    num_dice: u16,
    rng: &mut R,
) -> AttackOutcome {
    let num_attacker_dice = attacker_dice(attacker_armies, num_dice);
    let num_defender_dice = defender_dice(defender_armies);

    let mut attacker_rolls: Vec<u16> = (0..num_attacker_dice)
        .map(|_| rng.gen_range(1..=6))
        .collect();
    let mut defender_rolls: Vec<u16> = (0..num_defender_dice)
        .map(|_| rng.gen_range(1..=6))
        .collect();

    compare_rolls(&mut attacker_rolls, &mut defender_rolls)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    #[test]
    fn dice_counts_follow_the_rules() {
        assert_eq!(attacker_dice(2, 3), 1);
        assert_eq!(attacker_dice(3, 3), 2);
        assert_eq!(attacker_dice(4, 3), 3);
        assert_eq!(attacker_dice(10, 3), 3);
        assert_eq!(attacker_dice(10, 2), 2);
        assert_eq!(attacker_dice(1, 3), 0);

        assert_eq!(defender_dice(1), 1);
        assert_eq!(defender_dice(2), 2);
        assert_eq!(defender_dice(7), 2);
    }

    #[test]
    fn ties_favor_the_defender() {
        let outcome = compare_rolls(&mut vec![3, 3], &mut vec![3, 3]);
        assert_eq!(outcome.attacker_losses, 2);
        assert_eq!(outcome.defender_losses, 0);
    }

    #[test]
    fn higher_roll_kills_one_army_per_pair() {
        let outcome = compare_rolls(&mut vec![6, 4, 1], &mut vec![5, 5]);
        // Sorted pairing: 6 vs 5 and 4 vs 5.
        assert_eq!(outcome.defender_losses, 1);
        assert_eq!(outcome.attacker_losses, 1);
    }

    #[test]
    fn rolls_are_compared_sorted_not_in_arrival_order() {
        let outcome = compare_rolls(&mut vec![1, 6], &mut vec![5, 2]);
        assert_eq!(outcome.defender_losses, 1);
        assert_eq!(outcome.attacker_losses, 1);
    }

    #[test]
    fn losses_never_exceed_the_shorter_dice_count() {
        let mut rng = SmallRng::seed_from_u64(42);
        for attacker in 2..8u16 {
            for defender in 1..5u16 {
                let outcome = resolve_attack(attacker, defender, 3, &mut rng);
                let comparisons =
                    attacker_dice(attacker, 3).min(defender_dice(defender));
                assert_eq!(
                    outcome.attacker_losses + outcome.defender_losses,
                    comparisons
                );
            }
        }
    }

    #[test]
    fn seeded_resolution_is_deterministic() {
        let a = resolve_attack(5, 3, 3, &mut SmallRng::seed_from_u64(7));
        let b = resolve_attack(5, 3, 3, &mut SmallRng::seed_from_u64(7));
        assert_eq!(a, b);
    }
}
