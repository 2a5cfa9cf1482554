use avltree::AvlTree;

fn main() {
    let mut tree = AvlTree::new();
    tree.insert("pear");
    tree.insert("apple");
    tree.insert("fig");
    tree.insert("apple");
    tree.insert("kiwi");
    tree.insert("banana");
    assert_eq!(tree.count(&"apple"), 2);

    tree.remove(&"apple");
    assert!(tree.contains(&"apple"));
    tree.remove(&"apple");
    assert!(!tree.contains(&"apple"));

    println!("{} keys, height {}", tree.len(), tree.height());
    print!("{{ ");
    for key in &tree {
        print!("{key}, ");
    }
    println!("}}");
}
