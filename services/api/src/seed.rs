//! Sample catalog seeding

use rust_decimal::Decimal;
use tracing::{error, info};

use crate::error::ApiError;
use crate::models::NewProduct;
use crate::repositories::ProductRepository;

/// Insert the sample catalog unless products already exist. Returns the
/// number of products inserted.
pub async fn init_sample_data(products: &ProductRepository) -> Result<usize, ApiError> {
    let existing = products.count().await.map_err(|e| {
        error!("Failed to count products: {}", e);
        ApiError::Internal
    })?;
    if existing > 0 {
        return Ok(0);
    }

    let samples = sample_products();
    let total = samples.len();
    for product in &samples {
        products.insert(product).await.map_err(|e| {
            error!("Failed to insert sample product {}: {}", product.name, e);
            ApiError::Internal
        })?;
    }

    info!("Seeded {} sample products", total);
    Ok(total)
}

fn sample_products() -> Vec<NewProduct> {
    vec![
        NewProduct {
            name: "Bánh Croissant Bơ".to_string(),
            description: "Bánh croissant thơm ngon với lớp bơ tan chảy bên trong".to_string(),
            price: Decimal::from(45000),
            category: "Bánh Mì".to_string(),
            image_url: "https://images.unsplash.com/photo-1555507036-ab1f4038808a".to_string(),
        },
        NewProduct {
            name: "Bánh Ngọt Việt Nam".to_string(),
            description: "Các loại bánh ngọt truyền thống Việt Nam".to_string(),
            price: Decimal::from(35000),
            category: "Bánh Ngọt".to_string(),
            image_url: "https://images.unsplash.com/photo-1734520574432-dd1873c93092".to_string(),
        },
        NewProduct {
            name: "Bánh Kem Sinh Nhật".to_string(),
            description: "Bánh kem sinh nhật thơm ngon, đẹp mắt".to_string(),
            price: Decimal::from(250000),
            category: "Bánh Kem".to_string(),
            image_url: "https://images.unsplash.com/photo-1556745750-68295fefafc5".to_string(),
        },
        NewProduct {
            name: "Bánh Macaron Pháp".to_string(),
            description: "Bánh macaron Pháp nhiều hương vị".to_string(),
            price: Decimal::from(80000),
            category: "Bánh Ngọt".to_string(),
            image_url: "https://images.unsplash.com/photo-1483695028939-5bb13f8648b0".to_string(),
        },
        NewProduct {
            name: "Bánh Donut Truyền Thống".to_string(),
            description: "Bánh donut chiên giòn, phủ đường".to_string(),
            price: Decimal::from(25000),
            category: "Bánh Ngọt".to_string(),
            image_url: "https://images.unsplash.com/photo-1663667150807-925ddb84621d".to_string(),
        },
        NewProduct {
            name: "Bánh Cupcake Mini".to_string(),
            description: "Bánh cupcake mini đáng yêu, nhiều màu sắc".to_string(),
            price: Decimal::from(30000),
            category: "Bánh Kem".to_string(),
            image_url: "https://images.unsplash.com/photo-1612177434015-83ee396a236d".to_string(),
        },
    ]
}
