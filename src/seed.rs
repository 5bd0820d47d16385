use crate::models::{Host, Listing, DEFAULT_CURRENCY};

fn pexels(id: u32) -> String {
    format!(
        "https://images.pexels.com/photos/{id}/pexels-photo-{id}.jpeg",
        id = id
    )
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn host(
    id: &str,
    name: &str,
    is_superhost: bool,
    photo: u32,
    response_rate: f64,
    response_time: &str,
    join_date: &str,
) -> Host {
    Host {
        id: id.to_string(),
        name: name.to_string(),
        is_superhost,
        profile_image: pexels(photo),
        response_rate: Some(response_rate),
        response_time: Some(response_time.to_string()),
        join_date: Some(join_date.to_string()),
    }
}

/// The built-in listings served when no seed file is configured.
pub fn seed_listings() -> Vec<Listing> {
    vec![
        Listing {
            id: "1".to_string(),
            title: "Luxurious apartment with ocean view".to_string(),
            location: "Miami Beach, Florida".to_string(),
            address: Some("1234 Ocean Drive, Miami Beach, FL 33139".to_string()),
            latitude: None,
            longitude: None,
            price_per_night: 250.0,
            currency: DEFAULT_CURRENCY.to_string(),
            rating: 4.92,
            num_reviews: 124,
            images: vec![pexels(1571460), pexels(1457842), pexels(1743227)],
            description: "Beautiful apartment with stunning ocean views. Perfect for a romantic getaway or a small family vacation. Close to restaurants, shops, and beach.".to_string(),
            amenities: strings(&["Wifi", "Kitchen", "Air conditioning", "Pool", "Free parking", "Washer", "Dryer"]),
            host: host("h1", "Jessica", true, 762020, 98.0, "within an hour", "January 2018"),
            property_type: "Apartment".to_string(),
            capacity: 4,
            bedrooms: 2,
            beds: 2,
            baths: 2.0,
            total_price: None,
            check_in: None,
            check_out: None,
        },
        Listing {
            id: "2".to_string(),
            title: "Cozy cabin in the woods".to_string(),
            location: "Asheville, North Carolina".to_string(),
            address: Some("789 Forest Road, Asheville, NC 28801".to_string()),
            latitude: None,
            longitude: None,
            price_per_night: 175.0,
            currency: DEFAULT_CURRENCY.to_string(),
            rating: 4.87,
            num_reviews: 93,
            images: vec![pexels(803975), pexels(129494), pexels(259588)],
            description: "Escape to this peaceful cabin surrounded by nature. Enjoy hiking trails, wildlife, and gorgeous mountain views. Perfect for a relaxing retreat.".to_string(),
            amenities: strings(&["Wifi", "Kitchen", "Fireplace", "Free parking", "BBQ grill", "Heating"]),
            host: host("h2", "Michael", true, 220453, 100.0, "within a few hours", "March 2019"),
            property_type: "Cabin".to_string(),
            capacity: 6,
            bedrooms: 3,
            beds: 4,
            baths: 2.0,
            total_price: None,
            check_in: None,
            check_out: None,
        },
        Listing {
            id: "3".to_string(),
            title: "Modern downtown loft".to_string(),
            location: "Austin, Texas".to_string(),
            address: Some("456 Main Street, Austin, TX 78701".to_string()),
            latitude: None,
            longitude: None,
            price_per_night: 195.0,
            currency: DEFAULT_CURRENCY.to_string(),
            rating: 4.95,
            num_reviews: 87,
            images: vec![pexels(1918291), pexels(276554), pexels(2079249)],
            description: "Stylish loft in the heart of downtown Austin. Walk to restaurants, bars, and music venues. Perfect for exploring the city.".to_string(),
            amenities: strings(&["Wifi", "Kitchen", "Air conditioning", "Gym", "Washer", "Dryer", "TV"]),
            host: host("h3", "Sarah", false, 1239291, 95.0, "within a day", "June 2020"),
            property_type: "Loft".to_string(),
            capacity: 2,
            bedrooms: 1,
            beds: 1,
            baths: 1.0,
            total_price: None,
            check_in: None,
            check_out: None,
        },
        Listing {
            id: "4".to_string(),
            title: "Beachfront bungalow".to_string(),
            location: "Maui, Hawaii".to_string(),
            address: Some("123 Beach Road, Lahaina, HI 96761".to_string()),
            latitude: None,
            longitude: None,
            price_per_night: 350.0,
            currency: DEFAULT_CURRENCY.to_string(),
            rating: 4.99,
            num_reviews: 156,
            images: vec![pexels(261327), pexels(258154), pexels(189296)],
            description: "Beautiful bungalow steps from the beach. Fall asleep to the sound of waves and wake up to stunning ocean views. Paradise awaits!".to_string(),
            amenities: strings(&["Wifi", "Kitchen", "Air conditioning", "Beach access", "Outdoor shower", "BBQ grill"]),
            host: host("h4", "David", true, 775358, 99.0, "within an hour", "April 2017"),
            property_type: "Bungalow".to_string(),
            capacity: 4,
            bedrooms: 2,
            beds: 2,
            baths: 1.0,
            total_price: None,
            check_in: None,
            check_out: None,
        },
        Listing {
            id: "5".to_string(),
            title: "Historic brownstone with garden".to_string(),
            location: "Brooklyn, New York".to_string(),
            address: Some("567 Park Place, Brooklyn, NY 11238".to_string()),
            latitude: None,
            longitude: None,
            price_per_night: 275.0,
            currency: DEFAULT_CURRENCY.to_string(),
            rating: 4.91,
            num_reviews: 108,
            images: vec![pexels(1396122), pexels(1457842), pexels(271624)],
            description: "Charming brownstone in historic Brooklyn neighborhood. Features original details, modern amenities, and a lovely private garden.".to_string(),
            amenities: strings(&["Wifi", "Kitchen", "Heating", "Garden", "Washer", "Dryer", "TV"]),
            host: host("h5", "Emily", true, 1181686, 97.0, "within a few hours", "August 2018"),
            property_type: "Townhouse".to_string(),
            capacity: 6,
            bedrooms: 3,
            beds: 3,
            baths: 2.5,
            total_price: None,
            check_in: None,
            check_out: None,
        },
    ]
}
