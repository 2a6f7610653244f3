use crate::seq::{push, Pushback, UntilError};

#[test]
fn pushback_returns_pushed_items_first() {
    let mut seq = Pushback::new([1, 2, 3].into_iter());
    assert_eq!(seq.next(), Some(1));
    seq.push_back(1);
    assert_eq!(seq.next(), Some(1));
    assert_eq!(seq.next(), Some(2));
}

#[test]
fn stacked_pushbacks_pop_in_reverse() {
    let mut seq = Pushback::new(std::iter::empty::<u32>());
    seq.push_back(1);
    seq.push_back(2);
    assert_eq!(seq.next(), Some(2));
    assert_eq!(seq.next(), Some(1));
    assert_eq!(seq.next(), None);
}

#[test]
fn peek_does_not_consume() {
    let mut seq = Pushback::new([7, 8].into_iter());
    assert_eq!(seq.peek(), Some(&7));
    assert_eq!(seq.peek(), Some(&7));
    assert_eq!(seq.next(), Some(7));
    assert_eq!(seq.next(), Some(8));
    assert_eq!(seq.peek(), None);
}

#[test]
fn until_error_is_terminal_after_the_first_err() {
    let items: Vec<Result<u32, &str>> = vec![Ok(1), Err("boom"), Ok(2)];
    let mut seq = UntilError::new(items.into_iter());
    assert_eq!(seq.next(), Some(Ok(1)));
    assert_eq!(seq.next(), Some(Err("boom")));
    assert_eq!(seq.next(), None);
    assert_eq!(seq.next(), None);
}

#[test]
fn push_cancels_when_the_consumer_returns_false() {
    let mut seen = Vec::new();
    push([1, 2, 3, 4].into_iter(), |n| {
        seen.push(n);
        n < 2
    });
    assert_eq!(seen, vec![1, 2]);
}

#[test]
fn standard_combinators_compose_with_pushback() {
    let doubled: Vec<u32> = Pushback::new([1, 2, 3].into_iter())
        .map(|n| n * 2)
        .filter(|n| *n > 2)
        .collect();
    assert_eq!(doubled, vec![4, 6]);
}
