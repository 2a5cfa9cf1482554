use avltree::AvlTree;

fn main() {
    let tree: AvlTree<u32> = (1..=12).collect();

    // Levels are node heights, so indenting by them draws the tree sideways.
    println!("In-order traversal (height {}):", tree.height());
    tree.traverse(|key, level| {
        let indent = "    ".repeat((tree.height() - level) as usize);
        println!("{indent}{key} (level {level})");
        true
    });

    println!("Up to the first key above 6:");
    tree.traverse(|key, _| {
        println!("Key: {key}");
        *key <= 6
    });
}
