//! Demo catalogue loaded at startup when `BOOKS_SEED_DEMO_DATA` is set

use auth::models::NewUser;

use crate::models::Book;

/// Demo accounts, registered through the credential store so they are hashed
pub fn demo_users() -> Vec<NewUser> {
    [("Bobby", "bobcat"), ("Ted", "teddybear")]
        .into_iter()
        .map(|(username, display_name)| NewUser {
            username: username.to_string(),
            password: "123abc".to_string(),
            display_name: display_name.to_string(),
        })
        .collect()
}

/// Demo books; their authors have no accounts, so nobody can edit them
pub fn demo_books() -> Vec<Book> {
    vec![
        Book {
            id: 1,
            title: "The Rise of the Wookie".to_string(),
            description: "Start of the new galactic superpower lead by Emperor Chewbaca."
                .to_string(),
            cover_image: Some(
                "https://static.wikia.nocookie.net/starwars/images/7/73/WookieeTrio-MtHChewbacca.png/revision/latest?cb=20230810013600"
                    .to_string(),
            ),
            price: 16.50,
            author_username: "Chewy".to_string(),
            author_display_name: "furball".to_string(),
        },
        Book {
            id: 2,
            title: "Icile of Hoth".to_string(),
            description: "A frozen wookie found on the ice planet Hoth will awaken!".to_string(),
            cover_image: Some("http://example.com/covers/endor.jpg".to_string()),
            price: 21.89,
            author_username: "Luke".to_string(),
            author_display_name: "skywalker".to_string(),
        },
    ]
}
