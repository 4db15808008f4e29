//! GraphQL documents sent to the Storefront API.

pub const COLLECTIONS: &str = r"
query GetCollections {
  collections(first: 20) {
    nodes {
      title
      handle
    }
  }
}
";

pub const PRODUCTS_FROM_COLLECTION: &str = r"
query ProductsFromCollection($handle: String!) {
  collection(handle: $handle) {
    products(first: 12) {
      nodes {
        id
        handle
        title
        featuredImage {
          url
          altText
          width
          height
        }
        priceRange {
          minVariantPrice {
            amount
            currencyCode
          }
        }
      }
    }
  }
}
";

pub const PRODUCT_BY_HANDLE: &str = r"
query ProductByHandle($handle: String!) {
  product(handle: $handle) {
    id
    handle
    title
    description
    featuredImage {
      url
      altText
    }
    images(first: 10) {
      nodes {
        url
        altText
      }
    }
    options {
      name
      values
    }
    variants(first: 30) {
      nodes {
        id
        availableForSale
        selectedOptions {
          name
          value
        }
        image {
          url
          altText
        }
        price {
          amount
          currencyCode
        }
      }
    }
  }
}
";
