use super::repository::OrderItemOption;
use crate::modules::dish::repository::DishOption;
use bigdecimal::BigDecimal;

/// Prices a single ordered dish: the base price plus the surcharge of every
/// picked option. An option's own flat surcharge wins over its choices'
/// surcharges. Picks that don't match anything on the menu cost nothing.
pub fn unit_price(
    base: &BigDecimal,
    dish_options: &[DishOption],
    picked: &[OrderItemOption],
) -> BigDecimal {
    let mut price = base.clone();

    for pick in picked {
        let Some(option) = dish_options.iter().find(|o| o.name == pick.name) else {
            continue;
        };

        if let Some(extra) = &option.extra {
            price += extra;
            continue;
        }

        let choice = pick.choice.as_ref().and_then(|name| {
            option
                .choices
                .as_ref()
                .and_then(|choices| choices.iter().find(|c| &c.name == name))
        });

        if let Some(extra) = choice.and_then(|c| c.extra.as_ref()) {
            price += extra;
        }
    }

    price
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::dish::repository::DishChoice;

    fn spice_option() -> DishOption {
        DishOption {
            name: String::from("spice level"),
            extra: None,
            choices: Some(vec![
                DishChoice {
                    name: String::from("mild"),
                    extra: None,
                },
                DishChoice {
                    name: String::from("hot"),
                    extra: Some(BigDecimal::from(1)),
                },
            ]),
        }
    }

    fn size_option() -> DishOption {
        DishOption {
            name: String::from("size"),
            extra: Some(BigDecimal::from(3)),
            choices: Some(vec![DishChoice {
                name: String::from("large"),
                extra: Some(BigDecimal::from(99)),
            }]),
        }
    }

    fn pick(name: &str, choice: Option<&str>) -> OrderItemOption {
        OrderItemOption {
            name: String::from(name),
            choice: choice.map(String::from),
        }
    }

    #[test]
    fn choice_surcharge_is_added_to_the_base_price() {
        let price = unit_price(
            &BigDecimal::from(12),
            &[spice_option()],
            &[pick("spice level", Some("hot"))],
        );
        assert_eq!(price, BigDecimal::from(13));
    }

    #[test]
    fn free_choices_cost_nothing() {
        let price = unit_price(
            &BigDecimal::from(12),
            &[spice_option()],
            &[pick("spice level", Some("mild"))],
        );
        assert_eq!(price, BigDecimal::from(12));
    }

    #[test]
    fn flat_option_surcharge_wins_over_its_choices() {
        let price = unit_price(
            &BigDecimal::from(10),
            &[size_option()],
            &[pick("size", Some("large"))],
        );
        assert_eq!(price, BigDecimal::from(13));
    }

    #[test]
    fn unmatched_picks_are_ignored() {
        let price = unit_price(
            &BigDecimal::from(10),
            &[spice_option()],
            &[
                pick("no such option", None),
                pick("spice level", Some("no such choice")),
            ],
        );
        assert_eq!(price, BigDecimal::from(10));
    }

    #[test]
    fn pick_order_does_not_change_the_price() {
        let options = [spice_option(), size_option()];
        let forward = unit_price(
            &BigDecimal::from(10),
            &options,
            &[pick("spice level", Some("hot")), pick("size", None)],
        );
        let backward = unit_price(
            &BigDecimal::from(10),
            &options,
            &[pick("size", None), pick("spice level", Some("hot"))],
        );
        assert_eq!(forward, backward);
        assert_eq!(forward, BigDecimal::from(14));
    }
}
